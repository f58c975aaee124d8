//! Prompts for the feedback and extraction passes.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — tweaking what the reviewer focuses on or
//!    how the extraction schema is described requires editing exactly one
//!    place.
//!
//! 2. **Testability** — unit tests can inspect prompts directly without a
//!    live model call, so schema-description regressions are easy to catch.
//!
//! The persona is sent as the `systemInstruction` block (override or drop it
//! via [`crate::config::GatewayConfigBuilder::system_instruction`]); the two
//! user-facing prompts are fixed.

/// Fixed reviewer persona, sent as the system instruction on every call.
pub const REVIEWER_PERSONA: &str = r#"You are an expert CV reviewer for the tech industry. Analyze the CV you are given and provide detailed, actionable feedback. Focus on:
1. Overall structure and formatting
2. Professional summary
3. Work experience (including quantifiable achievements)
4. Skills section
5. Education and certifications
6. Projects or portfolio
7. Tailoring for tech roles

Provide specific suggestions for improvement and highlight any red flags.
Format your response in markdown for easy reading."#;

/// Prompt for the free-form feedback pass. The CV itself travels alongside
/// as a file-data part, so the prompt only has to point at it.
pub const FEEDBACK_PROMPT: &str = "Please review the attached CV and provide feedback.";

/// Build the structured-extraction prompt embedding the feedback text.
///
/// The natural-language schema below is what the model is asked to fill in.
/// Note the deliberate mismatch with [`crate::output::StructuredCv`]: the
/// prompt also requests `improvementAreas` and `overallScore`, which the
/// record ignores on parse. Keeping them in the prompt steers the model
/// toward a complete, self-consistent answer.
pub fn extraction_prompt(feedback: &str) -> String {
    format!(
        r#"Based on the original CV content and the feedback provided, extract and structure the following information in a JSON format:

1. name: The full name of the CV owner
2. title: The current or desired job title
3. summary: A brief professional summary (max 50 words)
4. experience: An array of the most recent 3 job experiences, each containing:
   - position
   - company
   - duration
   - responsibilities (an array of short bullet points)
5. skills: An array of top 5 skills with a proficiency level (1-100)
6. education: An array of up to 2 most relevant educational qualifications, each containing:
   - degree
   - school
   - year
7. achievements: An array of up to 3 notable professional achievements or awards
8. improvementAreas: An array of 3 key areas for improvement based on the feedback
9. overallScore: A number from 1-100 representing the overall quality of the CV

Feedback:
{feedback}

Ensure all data is accurately extracted or reasonably inferred from the provided information. If any information is missing, use placeholder text or omit the field. Please remove ```json and ``` from the output."#
    )
}
