//! Prompt template management.

use handlebars::{no_escape, Handlebars};
use serde::Serialize;

use crate::error::PipelineError;

/// Template name for complexity scoring.
pub const COMPLEXITY: &str = "complexity";

/// Template name for domain/technology classification.
pub const LABELS: &str = "labels";

/// System instruction for complexity scoring.
pub const COMPLEXITY_SYSTEM_PROMPT: &str = "You are an assistant for task complexity analysis.";

/// System instruction for domain/technology classification.
pub const LABELS_SYSTEM_PROMPT: &str =
    "You are an assistant for domain and technology classification.";

/// Manages Handlebars prompt templates.
///
/// Escaping is disabled: issue text is embedded exactly as the tracker
/// returned it.
pub struct PromptManager {
    handlebars: Handlebars<'static>,
}

impl PromptManager {
    /// Create a new prompt manager with embedded templates.
    pub fn new() -> Result<Self, PipelineError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(no_escape);
        handlebars.set_strict_mode(true);

        for (name, template) in [(COMPLEXITY, COMPLEXITY_TEMPLATE), (LABELS, LABELS_TEMPLATE)] {
            handlebars
                .register_template_string(name, template)
                .map_err(|e| PipelineError::Template(e.to_string()))?;
        }

        Ok(Self { handlebars })
    }

    /// Render a template with the given data.
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String, PipelineError> {
        self.handlebars
            .render(template, data)
            .map_err(|e| PipelineError::Template(e.to_string()))
    }
}

/// Complexity classification prompt template.
const COMPLEXITY_TEMPLATE: &str = r"You are a task complexity classification assistant.

Classify the complexity level of the following Jira task based on these detailed criteria:
- 0: Unable to determine - The task details are too vague, incomplete, or ambiguous to assess complexity accurately.
- 1: Low - Tasks with clear and well-defined requirements, minimal dependencies, and no custom development.
- 2: Medium - Tasks with some technical or business dependencies, manageable within a known framework, or requiring moderate custom development.
- 3: High - Tasks with significant dependencies, vague requirements, or involving new/unproven technologies.

Additional considerations:
- Evaluate the **clarity of requirements** (e.g., vague tasks should lean towards 0 or 3 depending on context).
- Assess the **number of dependencies** (e.g., systems, teams, or APIs involved).
- Factor in **technical difficulty**, including the need for custom development or advanced tools.
- Consider **strategic importance** (e.g., business-critical tasks should lean towards higher complexity).

Task Summary: {{summary}}
Task Description: {{description}}

Respond **only** with the number representing the complexity level (0, 1, 2, or 3). Do not add any explanation or additional text.

Example:
Input:
Task Summary: Fix a typo on the About Us page.
Task Description: Correct a spelling mistake in the company mission statement.
Output: 1

Input:
Task Summary: Migrate legacy database.
Task Description: No details provided.
Output: 0

Input:
Task Summary: Build a customer-facing mobile app.
Task Description: Develop an iOS/Android app for e-commerce with secure payments, real-time order tracking, and personalized product recommendations.
Output: 3
";

/// Domain/technology classification prompt template.
const LABELS_TEMPLATE: &str = r"Based on the following task details, determine:
1. The most suitable domain(s) (up to 2) from this list: {{domains}}.
2. The most suitable technology(s) (up to 2) from this list: {{technologies}}.

Task Summary: {{summary}}
Task Description: {{description}}

Respond in this format:
Domains: <semicolon-separated list of domains>
Technologies: <semicolon-separated list of technologies>
";
