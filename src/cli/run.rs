//! Interactive and one-shot posting generation

use hirecrew_core::{GeneratedPosting, JobPostingRequest};
use inquire::Text;

/// Prompt for the four posting inputs, then run the pipeline.
pub async fn run() -> anyhow::Result<()> {
    println!("Hirecrew job posting generator\n");

    let company_domain = Text::new("Company domain:")
        .with_help_message("e.g. careers.acme.example")
        .prompt()?;
    let company_description = Text::new("Company description:")
        .with_help_message("A sentence or two about what the company does")
        .prompt()?;
    let hiring_needs = Text::new("Hiring needs:")
        .with_help_message("Role and requirements, e.g. Senior Rust Engineer, remote")
        .prompt()?;
    let specific_benefits = Text::new("Specific benefits:")
        .with_help_message("Benefits to highlight in the posting")
        .prompt()?;

    let request = JobPostingRequest {
        company_domain: company_domain.trim().to_string(),
        company_description: company_description.trim().to_string(),
        hiring_needs: hiring_needs.trim().to_string(),
        specific_benefits: specific_benefits.trim().to_string(),
    };

    if request.company_domain.is_empty() || request.hiring_needs.is_empty() {
        anyhow::bail!("company domain and hiring needs are required");
    }

    let posting = super::run_pipeline(request).await?;
    print_result(&posting);
    Ok(())
}

/// Run the pipeline against the built-in sample inputs.
pub async fn quick() -> anyhow::Result<()> {
    let request = super::sample_request();
    println!(
        "Generating a posting for {} ({})...\n",
        request.company_domain, request.hiring_needs
    );

    let posting = super::run_pipeline(request).await?;
    print_result(&posting);
    Ok(())
}

fn print_result(posting: &GeneratedPosting) {
    println!("\n{}\n", posting.markdown);
    println!("Saved to {}", posting.metadata.markdown_path.display());
    println!("Metadata at {}", posting.metadata_path.display());
}
