//! Agent definitions
//!
//! The three role-specialized agents of the crew. Each agent is static
//! descriptive data rendered into a system prompt; the crew decides which
//! provider call it feeds into.

/// A role-specialized agent.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Stable identifier used by tasks to reference the agent
    pub id: &'static str,
    /// Role title
    pub role: &'static str,
    /// What the agent is trying to achieve
    pub goal: &'static str,
    /// Persona background shaping the agent's tone
    pub backstory: &'static str,
}

impl Agent {
    /// The Research Analyst: extracts culture, values, and needs.
    #[must_use]
    pub fn research_analyst() -> Self {
        Self {
            id: "research",
            role: "Research Analyst",
            goal: "Analyze the company website and provided description to extract \
                   insights on culture, values, and specific needs.",
            backstory: "Expert in analyzing company cultures and identifying key values \
                        and needs from various sources, including websites and brief \
                        descriptions.",
        }
    }

    /// The Job Description Writer: turns research into a draft posting.
    #[must_use]
    pub fn writer() -> Self {
        Self {
            id: "writer",
            role: "Job Description Writer",
            goal: "Use insights from the Research Analyst to create a detailed, \
                   engaging, and enticing job posting.",
            backstory: "Skilled in crafting compelling job descriptions that resonate \
                        with the company's values and attract the right candidates.",
        }
    }

    /// The Review and Editing Specialist: polishes the draft.
    #[must_use]
    pub fn editor() -> Self {
        Self {
            id: "editor",
            role: "Review and Editing Specialist",
            goal: "Review the job posting for clarity, engagement, grammatical \
                   accuracy, and alignment with company values and refine it to \
                   ensure perfection.",
            backstory: "A meticulous editor with an eye for detail, ensuring every \
                        piece of content is clear, engaging, and grammatically perfect.",
        }
    }

    /// All crew agents.
    #[must_use]
    pub fn crew() -> Vec<Self> {
        vec![Self::research_analyst(), Self::writer(), Self::editor()]
    }

    /// Render the agent into a system prompt.
    #[must_use]
    pub fn system_prompt(&self) -> String {
        format!(
            "You are the {role}.\n\n\
             Goal: {goal}\n\n\
             Background: {backstory}\n\n\
             Respond with the deliverable only, formatted in markdown.",
            role = self.role,
            goal = self.goal,
            backstory = self.backstory,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crew_has_three_distinct_agents() {
        let crew = Agent::crew();
        assert_eq!(crew.len(), 3);
        let ids: Vec<_> = crew.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["research", "writer", "editor"]);
    }

    #[test]
    fn test_system_prompt_contains_role_and_goal() {
        let agent = Agent::research_analyst();
        let prompt = agent.system_prompt();
        assert!(prompt.contains("Research Analyst"));
        assert!(prompt.contains("culture, values"));
    }
}
