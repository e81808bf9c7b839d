//! Task definitions
//!
//! Static task templates wired to agents. Descriptions carry
//! `{placeholder}` markers that `render` interpolates from the request;
//! the expected-output text is appended to the prompt so each stage knows
//! the shape of its deliverable.

use crate::error::{Error, Result};
use crate::posting::JobPostingRequest;

/// A pipeline task: a prompt template bound to an agent.
#[derive(Debug, Clone)]
pub struct Task {
    /// Task name
    pub name: &'static str,
    /// Agent id this task runs under
    pub agent_id: &'static str,
    /// Description template with `{placeholder}` markers
    pub description: &'static str,
    /// Expected shape of the deliverable
    pub expected_output: &'static str,
}

impl Task {
    /// Research the company's culture, values, and mission.
    #[must_use]
    pub fn research_company_culture() -> Self {
        Self {
            name: "research_company_culture",
            agent_id: "research",
            description: "Analyze the provided company website and the hiring manager's \
                company's domain {company_domain}, description {company_description}. \
                Focus on understanding the company's culture, values, and mission. \
                Identify unique selling points and specific projects or achievements \
                highlighted on the site. Compile a report summarizing these insights, \
                specifically how they can be leveraged in a job posting to attract \
                the right candidates.",
            expected_output: "A comprehensive report detailing the company's culture, \
                values, and mission, along with specific selling points relevant to \
                the job role. Suggestions on incorporating these insights into the \
                job posting should be included.",
        }
    }

    /// Identify the skills, experience, and qualities the role requires.
    #[must_use]
    pub fn research_role_requirements() -> Self {
        Self {
            name: "research_role_requirements",
            agent_id: "research",
            description: "Based on the hiring manager's needs: {hiring_needs}, identify \
                the key skills, experiences, and qualities the ideal candidate should \
                possess for the role. Consider the company's current projects, its \
                competitive landscape, and industry trends. Prepare a list of \
                recommended job requirements and qualifications that align with the \
                company's needs and values.",
            expected_output: "A list of recommended skills, experiences, and qualities \
                for the ideal candidate, aligned with the company's culture, ongoing \
                projects, and the specific role's requirements.",
        }
    }

    /// Analyze the industry around the company's domain.
    #[must_use]
    pub fn industry_analysis() -> Self {
        Self {
            name: "industry_analysis",
            agent_id: "research",
            description: "Conduct an in-depth analysis of the industry related to the \
                company's domain {company_domain}. Investigate current trends, \
                challenges, and opportunities within the industry, utilizing market \
                reports, recent developments, and expert opinions. Assess how these \
                factors could impact the role being hired for and the overall \
                attractiveness of the position to potential candidates.",
            expected_output: "A detailed analysis report that identifies major industry \
                trends, challenges, and opportunities relevant to the company's domain \
                and the specific job role. This report should provide strategic \
                insights on positioning the job role and the company as an attractive \
                choice for potential candidates.",
        }
    }

    /// Draft the job posting from the research.
    #[must_use]
    pub fn draft_job_posting() -> Self {
        Self {
            name: "draft_job_posting",
            agent_id: "writer",
            description: "Draft a job posting for the role described by the hiring \
                manager: {hiring_needs}. Use the insights on {company_description} to \
                start with a compelling introduction, followed by a detailed role \
                description, responsibilities, and required skills and qualifications. \
                Ensure the tone aligns with the company's culture and incorporate any \
                unique benefits or opportunities offered by the company. Specific \
                benefits: {specific_benefits}.",
            expected_output: "A detailed, engaging job posting that includes an \
                introduction, role description, responsibilities, requirements, and \
                unique company benefits. The tone should resonate with the company's \
                culture and values, aimed at attracting the right candidates.",
        }
    }

    /// Review and polish the draft; produces the final artifact.
    #[must_use]
    pub fn review_and_edit() -> Self {
        Self {
            name: "review_and_edit",
            agent_id: "editor",
            description: "Review the draft job posting for the role {hiring_needs}. \
                Check for clarity, engagement, grammatical accuracy, and alignment \
                with the company's culture and values. Edit and refine the content, \
                ensuring it speaks directly to the desired candidates and accurately \
                reflects the role's unique benefits and opportunities.",
            expected_output: "A polished, error-free job posting that is clear, \
                engaging, and perfectly aligned with the company's culture and \
                values. Formatted in markdown.",
        }
    }

    /// The pipeline's tasks in execution order. Research stages come
    /// first, the review stage is last so its output is the final posting.
    #[must_use]
    pub fn pipeline() -> Vec<Self> {
        vec![
            Self::research_company_culture(),
            Self::research_role_requirements(),
            Self::industry_analysis(),
            Self::draft_job_posting(),
            Self::review_and_edit(),
        ]
    }

    /// Interpolate the request into the description template.
    ///
    /// Fails if any `{placeholder}` marker remains unresolved.
    pub fn render(&self, request: &JobPostingRequest) -> Result<String> {
        let rendered = self
            .description
            .replace("{company_domain}", &request.company_domain)
            .replace("{company_description}", &request.company_description)
            .replace("{hiring_needs}", &request.hiring_needs)
            .replace("{specific_benefits}", &request.specific_benefits);

        if let Some(leftover) = find_placeholder(&rendered) {
            return Err(Error::Render {
                task: self.name.to_string(),
                message: format!("unresolved placeholder '{}'", leftover),
            });
        }
        Ok(rendered)
    }
}

/// Find a `{lower_snake_case}` placeholder in rendered text, if any.
///
/// Interpolated values may legitimately contain braces, so only the
/// placeholder shape counts.
fn find_placeholder(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut start = None;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'{' => start = Some(i),
            b'}' => {
                if let Some(s) = start.take() {
                    let inner = &text[s + 1..i];
                    if !inner.is_empty()
                        && inner.bytes().all(|c| c.is_ascii_lowercase() || c == b'_')
                    {
                        return Some(&text[s..=i]);
                    }
                }
            }
            c if c.is_ascii_lowercase() || c == b'_' => {}
            _ => start = None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> JobPostingRequest {
        JobPostingRequest {
            company_domain: "acme.example".to_string(),
            company_description: "Rocket-powered software".to_string(),
            hiring_needs: "Senior Rust Engineer".to_string(),
            specific_benefits: "Remote-first, learning budget".to_string(),
        }
    }

    #[test]
    fn test_pipeline_order_ends_with_review() {
        let tasks = Task::pipeline();
        assert_eq!(tasks.len(), 5);
        assert_eq!(tasks[0].name, "research_company_culture");
        assert_eq!(tasks.last().unwrap().name, "review_and_edit");
        assert_eq!(tasks.last().unwrap().agent_id, "editor");
    }

    #[test]
    fn test_render_interpolates_all_placeholders() {
        let request = sample_request();
        for task in Task::pipeline() {
            let rendered = task.render(&request).unwrap();
            assert!(!rendered.contains('{'), "task {} left a placeholder", task.name);
        }

        let culture = Task::research_company_culture().render(&request).unwrap();
        assert!(culture.contains("acme.example"));
        assert!(culture.contains("Rocket-powered software"));

        let draft = Task::draft_job_posting().render(&request).unwrap();
        assert!(draft.contains("Senior Rust Engineer"));
        assert!(draft.contains("Remote-first, learning budget"));
    }

    #[test]
    fn test_find_placeholder() {
        assert_eq!(find_placeholder("hello {hiring_needs} world"), Some("{hiring_needs}"));
        assert_eq!(find_placeholder("no markers here"), None);
        // Braces inside interpolated values are not placeholders
        assert_eq!(find_placeholder("code sample: fn main() {}"), None);
        assert_eq!(find_placeholder("json {\"key\": 1}"), None);
    }
}
