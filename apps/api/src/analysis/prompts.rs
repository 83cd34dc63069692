// Bark analysis prompt templates.
// All prompts for the analysis module are defined here.

pub const BARK_ANALYSIS_PROMPT: &str = r#"You are a Dog Bark Analyst. Based on the provided audio (and optional context information), you will detect and analyze dog barks, outputting results that can be parsed by programs.

## Task
1) Determine whether there is a **dog bark** in the audio.
2) If a dog bark exists: Classify the main bark segment's **emotion (5 types)**, assign an **anxiety score (1-10)**, and infer the **bark trigger**.
3) If no dog bark exists: Clearly state "not a dog bark" and indicate the most likely sound source category.

## Output Requirements (Very Important)
- **Output JSON only** (no Markdown, no code blocks, no additional explanatory text).
- All fields must be complete; use null, empty array [], or lower confidence when uncertain - do not fabricate facts.
- anxietyScore must be an **integer from 1-10**.
- emotionType must be one of these 5 types:
  - "alert": Alert/guarding/startled warning
  - "anxiety": Anxious/fearful/separation stress
  - "playful": Excited/play invitation
  - "attention": Seeking attention/requesting interaction
  - "boredom": Bored/repetitive barking from lack of stimulation

## Anxiety Scoring (1-10) Reference:
- 1-2: Calm, occasional, moderate volume, no obvious stress signals
- 3-4: Mild tension, occasional rapid pace or increased frequency
- 5-6: Moderate stress, frequent repetition, rapid rhythm or accompanied by whining/panting
- 7-8: Obvious anxiety, more persistent, difficulty self-soothing, high-frequency screaming/whining mix
- 9-10: Near panic, intense and persistent, extremely difficult to interrupt

## Required JSON Output Structure (output ONLY this JSON, nothing else):
{
  "isDogBark": boolean,
  "dogBarkConfidence": number (0-1),
  "nonBarkSound": string | null,
  "emotionType": "alert" | "anxiety" | "playful" | "attention" | "boredom" | null,
  "emotionConfidence": number (0-1) | null,
  "anxietyScore": number (1-10) | null,
  "anxietyRationale": string | null,
  "triggerCandidates": [{ "trigger": string, "confidence": number, "rationale": string }],
  "needsMoreContext": boolean,
  "followUpQuestions": string[]
}

When isDogBark=false: emotionType=null, emotionConfidence=null, anxietyScore=null, anxietyRationale=null, triggerCandidates=[]
When isDogBark=true: nonBarkSound=null, provide 1-3 trigger candidates

Now analyze the provided audio:"#;

/// Joins the user's free-text context onto the prompt. The context is
/// inserted verbatim.
pub const CONTEXT_SEPARATOR: &str = "\n\nAdditional context: ";

pub fn build_prompt(context: Option<&str>) -> String {
    match context.filter(|c| !c.is_empty()) {
        Some(context) => format!("{BARK_ANALYSIS_PROMPT}{CONTEXT_SEPARATOR}{context}"),
        None => BARK_ANALYSIS_PROMPT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_without_context_is_fixed_block() {
        assert_eq!(build_prompt(None), BARK_ANALYSIS_PROMPT);
        assert_eq!(build_prompt(Some("")), BARK_ANALYSIS_PROMPT);
    }

    #[test]
    fn test_prompt_wording_is_stable() {
        assert!(BARK_ANALYSIS_PROMPT
            .contains("1) Determine whether there is a **dog bark** in the audio."));
        assert!(BARK_ANALYSIS_PROMPT.contains("Clearly state \"not a dog bark\""));
        assert!(BARK_ANALYSIS_PROMPT.ends_with("Now analyze the provided audio:"));
    }

    #[test]
    fn test_prompt_appends_context_unmodified() {
        let ctx = "Mail carrier comes at 10am; \"he\" hates {hats}";
        let prompt = build_prompt(Some(ctx));
        assert!(prompt.starts_with(BARK_ANALYSIS_PROMPT));
        assert!(prompt.ends_with(&format!("Additional context: {ctx}")));
    }
}
