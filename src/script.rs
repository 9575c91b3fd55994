use anyhow::{Context, Result};
use std::path::Path;

const INTRO: &str = concat!(
    "Hi, I'm a workflow automation tool. To begin, let's gather some key details about your case to get started. ",
    "If you don't know something, you can leave it blank. To start with, could you provide a one-line summary of the project?",
);

const INFERRED_CONTEXT: &str = concat!(
    "Great, this is what I've identified so far:\n\n",
    "- **Case Industry**: Automotive & Mobility\n",
    "- **Problem to Solve**: Strategy\n\n",
    "To help improve the quality of my response, I would like you to provide some more information about the case.\n",
    "Firstly, what is the expected case length?",
);

const GEOGRAPHY: &str =
    "Thank you, and what is the expected geography of the case? (**Global**, **Regional**, **National**)";

const RESOURCES: &str = "Thank you, and how many resources are you expecting to be working on this case? (**M+1**, **M+2**, **M+3**, **M+4**, Other)";

const SUMMARY: &str = concat!(
    "Let me summarise all the information you've provided so far:\n\n",
    "- **Case Industry**: Automotive & Mobility\n",
    "- **Problem to Solve**: Strategy\n",
    "- **Case length**: 6 weeks\n",
    "- **Geography**: Global\n",
    "- **Case team resources**: M+4\n\n",
    "Is this correct?",
);

const ADDITIONAL_NOTES: &str = concat!(
    "Great - a few extra notes before we kick off:\n",
    "- I re-read the notes from your client kickoff call on Tuesday, and it seems like Pricing and Product are key priorities for the client. **Would you like me to reflect this in our workplan?**\n",
    "- It seems from news reports and forum chatter that the Client is receiving pressure from an activist investor in Singapore — a key concern is the company’s recent EPS. **Would you like me to include EPS impact analysis in the modelling workstream?**\n",
    "- It seems as though Laura, the Analyst on your case, has a key development priority to work on a client-facing workstream — **are you happy for me to allocate her time to the survey workstream?**\n",
);

const NEXT_STEPS: &str = concat!(
    "How would you like me to proceed?\n",
    "1. Generate a full project workplan\n",
    "2. Generate a workplan for a specific week (e.g., Week 1)\n",
    "3. Generate key meetings to schedule.",
);

const WORKPLAN: &str = concat!(
    "Based on the information you've provided, here's a proposed workplan with detailed workstreams and timelines:\n\n",
    "### **Proposed Workplan for Automotive Software Growth Strategy**\n\n",
    "#### **Suggested Workstreams:**\n\n",
    "---\n\n",
    "#### **1. Market Model (Weeks 1-5): Sylvia, Tom**\n",
    "**Objective:** Build a robust market sizing model to estimate market growth in automotive software cut by geography, module, customer archetype. Show growth over time and forecast to 2050.\n",
    "- **Data and Assumption Gathering (Weeks 1-2):**\n",
    "    - Collect relevant data and define modeling assumptions\n",
    "    - **Sources:** S&P Capital IQ, competitor reports, analyst data\n",
    "- **Model Setup + Driver Tree (Weeks 1-3):**\n",
    "    - Structure a market sizing framework with key drivers\n",
    "    - Pricing sensitivity analysis and impact on company EPS\n",
    "- **Driver Testing and Iteration (Weeks 4-5):**\n",
    "    - Validate assumptions and refine growth projections\n",
    "    - Pricing recommendations + impact on company EPS",
    "- **Output:** Market sizing model by geography, module, and customer archetype with forecasts to 2050 and accompanying slide [click to see example slides] + pricing recommendations\n\n",
    "---\n\n",
    "#### **2. Competitive Landscape (Weeks 2-4): Chelsea, Brian**\n",
    "**Objective:** Identify and analyze Automotive SoftwareCo's competitors to inform positioning and strategy.\n",
    "- **Global Archetypes and Key Players (Weeks 2-3):**\n",
    "    - Identify key competitor archetypes and players within each EPS comparison.\n",
    "    - **Sources:** Custom searches, industry associations, analyst reports.\n",
    "- **Zoom on Automotive SoftwareCo's Key Markets (Weeks 2-3):**\n",
    "    - Deep dive into Automotive SoftwareCo's specific geographic and product markets. -- zoom on pricing\n",
    "    - **Sources:** Client annual reports, financial reports, and regional data.\n",
    "- **Competitor Roadmaps (Weeks 3-4):**\n",
    "    - Analyze competitor offerings, strengths, and weaknesses relative to Automotive SoftwareCo.\n",
    "    - **Sources:** Competitor annual reports, industry white papers, thought leadership.\n\n",
    "---\n\n",
    "#### **3. Survey / Qualitative Data Gathering (Weeks 1-5): Laura, Diego**\n",
    "**Objective:** Gather insights from key Automotive SoftwareCo stakeholders and industry experts to inform strategic recommendations.\n",
    "- **Executive Survey Set-Up (Week 1):**\n",
    "    - Define question list.\n",
    "    - Define interviewee/recipient list.\n",
    "    - Schedule calls / code survey.\n",
    "- **Survey Execution (Weeks 2-3):**\n",
    "    - Conduct interviews.\n",
    "    - Distribute and manage survey responses.\n",
    "- **Survey Analysis (Weeks 4-5):**\n",
    "    - Consolidate findings.\n",
    "    - Develop visual outputs and insights.\n",
    "    - **Example Output:** Heatmap of priority focus areas.\n\n",
    "---\n\n",
    "#### **4. Product (Weeks 3-5): Chelsea, Tom**\n",
    "**Objective:** Understand product positioning and customer archetypes for Automotive SoftwareCo and competitors.\n",
    "- **DMS Product Overview (Weeks 3-5):**\n",
    "    - Analyze key modules, functionality, and market penetration.\n",
    "    - **Sources:** Competitor and industry reports, product specifications.\n",
    "- **Customer Archetypes (Weeks 3-5):**\n",
    "    - Define customer segments and personas based on survey and market data.\n",
    "- **Automotive SoftwareCo Product Suite Overview (Weeks 3-5):**\n",
    "    - Deep dive into Automotive SoftwareCo's products and customer segmentation.\n",
    "    - **Sources:** Internal client reports, industry benchmarks.\n\n",
    "---\n\n",
    "#### **5. Synthesis and Recommendation (Weeks 4-6): All**\n",
    "**Objective:** Deliver actionable strategic initiatives and a roadmap for implementation for Automotive SoftwareCo.\n",
    "- **Strategic Initiative Development (Weeks 4-5):**\n",
    "    - Prioritize based on geographies, customer archetypes, and competitive positioning.\n",
    "    - Incorporate survey findings, market model outputs, and product recommendations.\n",
    "- **High-Level Costing and 'Size of the Prize' (Week 5):**\n",
    "    - Estimate financial impact and resource requirements.\n",
    "- **Implementation Plan / Roadmap (Week 6):**\n",
    "    - Provide a phased roadmap for execution.\n",
);

const WEEK_1: &str = concat!(
    "Sure, see below the team’s suggested priorities for Week 1:\n",
    "#### **1. Market Model: Sylvia, Tom**\n",
    "**Data and Assumption Gathering:**\n",
    "- Collect relevant data and define modeling assumptions\n",
    "- **Sources:** S&P Capital IQ, competitor reports, analyst data\n",
    "**Model Setup + Driver Tree:**\n",
    "- Structure a market sizing framework with key drivers\n",
    "#### **2. Competitive Landscape: Chelsea, Brian**\n",
    "- Identify key competitor archetypes and players within each, EPS comparison\n",
    "- **Sources:** Custom searches, industry associations, analyst reports\n",
    "#### **3. Survey / Qualitative Data Gathering: Laura, Diego**\n",
    "- **Executive Survey Set-Up:**\n",
    "    - Define question list\n",
    "    - Define interviewee/recipient list\n",
    "    - Schedule calls / code survey\n",
    "---\n",
    "Does this workflow align with your vision for the engagement? Let me know if adjustments or additional details are needed!",
);

const SCHEDULE: &str = concat!(
    "Sure, see below a set of suggested meetings you can schedule to get started:\n\n",
    "**Key Meetings to Schedule:**\n",
    "- **Internal**\n",
    "    - Stand-ups and check-outs (daily)\n",
    "    - Partner 'content'/ problem-solving sessions (daily)\n",
    "    - Team check-ins (weekly)\n",
    "- **External**\n",
    "    - Check-in meetings with client counterparts (daily)\n",
    "    - Data gathering calls with relevant client stakeholders (Weeks 1 and 2)\n",
    "    - **Senior leadership Steering Committees for Weeks 3 and 6**\n",
    "\nWould you like me to check your team and client stakeholder availabilities and get these calls scheduled?",
);

const BUILTIN: [&str; 10] = [
    INTRO,
    INFERRED_CONTEXT,
    GEOGRAPHY,
    RESOURCES,
    SUMMARY,
    ADDITIONAL_NOTES,
    NEXT_STEPS,
    WORKPLAN,
    WEEK_1,
    SCHEDULE,
];

/// Ordered, immutable list of canned assistant replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTable {
    responses: Vec<String>,
}

impl ResponseTable {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
        }
    }

    /// The workplan assistant script shipped with the binary.
    pub fn builtin() -> Self {
        Self::new(BUILTIN)
    }

    /// Load a script from a JSON array of strings.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Could not read script {}", path.display()))?;
        let responses: Vec<String> = serde_json::from_slice(&bytes)
            .with_context(|| format!("Script {} is not a JSON array of strings", path.display()))?;
        if responses.is_empty() {
            anyhow::bail!("Script {} has no responses", path.display());
        }
        Ok(Self { responses })
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.responses.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_has_ten_steps() {
        let table = ResponseTable::builtin();
        assert_eq!(table.len(), 10);
        assert!(table.get(0).unwrap().starts_with("Hi, I'm a workflow automation tool"));
        assert!(table.get(7).unwrap().contains("Proposed Workplan"));
        assert!(table.get(10).is_none());
        assert!(!table.is_empty());
    }

    #[test]
    fn builtin_wording_is_verbatim() {
        let table = ResponseTable::builtin();
        let notes = table.get(5).unwrap();
        assert!(notes.contains("Singapore — a key concern is the company’s recent EPS."));
        assert!(notes.contains("workstream — **are you happy for me"));
        let workplan = table.get(7).unwrap();
        assert!(workplan.contains("impact on company EPS- **Output:**"));
        assert!(workplan.contains("product markets. -- zoom on pricing\n"));
        assert!(table.get(8).unwrap().starts_with("Sure, see below the team’s suggested priorities"));
    }

    #[test]
    fn empty_table_reports_empty() {
        let table = ResponseTable::new(Vec::<String>::new());
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert!(table.get(0).is_none());
    }

    #[test]
    fn loads_script_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["first", "second"]"#).unwrap();

        let table = ResponseTable::from_file(file.path()).unwrap();
        assert_eq!(table, ResponseTable::new(["first", "second"]));
    }

    #[test]
    fn rejects_empty_script() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();

        let err = ResponseTable::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("no responses"));
    }

    #[test]
    fn rejects_non_string_entries() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2]").unwrap();

        assert!(ResponseTable::from_file(file.path()).is_err());
    }
}
