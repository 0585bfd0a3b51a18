//! Generation boundary
//!
//! Contract with the external text-generation collaborator:
//! - [`TextGenerator`] sends one prompt and returns raw text
//! - [`GenerationBoundary`] builds the prompts, strips code fences, and
//!   validates the decoded output
//!
//! Every failure (transport, status, parse, shape, length) surfaces as a
//! [`GenerationError`]; the orchestrator treats them all as a layer failure.

use crate::error::GenerationError;
use crate::types::{GoalType, Milestone, SequenceEntry, UserContext};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::ops::RangeInclusive;
use std::sync::Arc;

/// Accepted length of a customized catalog sequence
pub const CUSTOMIZE_LEN: RangeInclusive<usize> = 3..=20;

/// Accepted length of a purely generated sequence
pub const GENERATE_LEN: RangeInclusive<usize> = 3..=15;

/// System instructions sent with every request
pub const SYSTEM_PROMPT: &str = "You are a life-planning assistant that designs realistic, \
ordered milestone roadmaps for personal goals. Milestone identifiers are lower snake_case \
and describe one stage of the journey each.";

/// Kind of request sent to the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Review and optionally rewrite a catalog sequence
    ValidateCustomize,
    /// Produce a sequence from the description alone
    PureGenerate,
    /// Polish milestone descriptions
    RefineText,
}

/// One prompt for the generator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    /// Request kind
    pub kind: RequestKind,
    /// System instructions
    pub system_prompt: String,
    /// User prompt
    pub prompt: String,
}

/// External text-generation service
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generator name, used in logs
    fn name(&self) -> &str {
        "generator"
    }

    /// Send one request and return the raw response text
    async fn complete(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn complete(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        (**self).complete(request).await
    }
}

/// Generator that refuses every request
///
/// Used when no external service is configured: every generation layer
/// fails and the planner degrades to the catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn complete(&self, _request: GenerationRequest) -> Result<String, GenerationError> {
        Err(GenerationError::Config("no text generator configured".to_string()))
    }
}

/// Parameters of a validate/customize request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateCustomizeParams<'a> {
    template_sequence: &'a [SequenceEntry],
    goal_type: &'a str,
    goal_description: &'a str,
    user_context: &'a UserContext,
}

/// Parameters of a pure generation request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PureGenerateParams<'a> {
    goal_description: &'a str,
    user_context: &'a UserContext,
}

/// Validated validate/customize answer
#[derive(Debug, Clone, PartialEq)]
pub struct Customization {
    /// Generator approved the catalog sequence as-is
    pub approved: bool,
    /// Sequence to use (normalized)
    pub customized_sequence: Vec<SequenceEntry>,
    /// Free-text reasoning from the generator
    pub insights: String,
}

/// Prompt building and response validation over a [`TextGenerator`]
#[derive(Debug, Clone)]
pub struct GenerationBoundary<G> {
    generator: G,
}

impl<G: TextGenerator> GenerationBoundary<G> {
    /// Wrap a generator
    #[inline]
    #[must_use]
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Underlying generator
    #[inline]
    #[must_use]
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Ask the generator to review and customize a catalog sequence
    pub async fn validate_and_customize(
        &self,
        template_sequence: &[SequenceEntry],
        goal: &GoalType,
        goal_description: &str,
        user_context: &UserContext,
    ) -> Result<Customization, GenerationError> {
        let params = ValidateCustomizeParams {
            template_sequence,
            goal_type: goal.as_str(),
            goal_description,
            user_context,
        };
        let prompt = format!(
            "Review this milestone sequence for the goal below. Approve it if it fits the \
             user's situation, otherwise return an improved sequence.\n\n{}\n\n\
             Respond with JSON only: {{\"approved\": boolean, \"customizedSequence\": \
             [snake_case strings, 3 to 20 items], \"insights\": string}}",
            serde_json::to_string_pretty(&params)?
        );

        let text = self.send(RequestKind::ValidateCustomize, prompt).await?;
        parse_customization(&text)
    }

    /// Ask the generator for a sequence built from the description alone
    pub async fn generate_sequence(
        &self,
        goal_description: &str,
        user_context: &UserContext,
    ) -> Result<Vec<SequenceEntry>, GenerationError> {
        let params = PureGenerateParams {
            goal_description,
            user_context,
        };
        let prompt = format!(
            "Design an ordered milestone sequence for this goal.\n\n{}\n\n\
             Respond with a JSON array of 3 to 15 snake_case strings only.",
            serde_json::to_string_pretty(&params)?
        );

        let text = self.send(RequestKind::PureGenerate, prompt).await?;
        parse_generated_sequence(&text)
    }

    /// Polish milestone descriptions
    ///
    /// Never fails: when the generator errors or returns fewer descriptions
    /// than milestones, the input milestones are returned unchanged.
    pub async fn refine_milestone_text(
        &self,
        goal: &GoalType,
        milestones: &[Milestone],
    ) -> Vec<Milestone> {
        if milestones.is_empty() {
            return Vec::new();
        }

        let titles: Vec<&str> = milestones.iter().map(|m| m.title.as_str()).collect();
        let prompt = format!(
            "Write one encouraging, specific sentence describing each milestone of a {} \
             plan, in order.\n\nMilestones: {}\n\nRespond with a JSON array of strings only.",
            goal,
            titles.join(", ")
        );

        let refined = match self.send(RequestKind::RefineText, prompt).await {
            Ok(text) => match parse_string_array(&text) {
                Ok(descriptions) => descriptions,
                Err(e) => {
                    tracing::warn!(error = %e, "refinement response rejected, keeping original text");
                    return milestones.to_vec();
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "refinement request failed, keeping original text");
                return milestones.to_vec();
            }
        };

        if refined.len() < milestones.len() {
            tracing::debug!(
                expected = milestones.len(),
                received = refined.len(),
                "refinement returned too few descriptions, keeping original text"
            );
            return milestones.to_vec();
        }

        milestones
            .iter()
            .zip(refined)
            .map(|(milestone, description)| {
                let mut milestone = milestone.clone();
                let description = description.trim();
                if !description.is_empty() {
                    milestone.description = description.to_string();
                }
                milestone
            })
            .collect()
    }

    async fn send(&self, kind: RequestKind, prompt: String) -> Result<String, GenerationError> {
        tracing::debug!(generator = self.generator.name(), ?kind, "sending generation request");
        let request = GenerationRequest {
            kind,
            system_prompt: SYSTEM_PROMPT.to_string(),
            prompt,
        };
        let text = self.generator.complete(request).await?;
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Strip a surrounding markdown code fence, if any
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();

    let inner = if let Some((_, rest)) = text.split_once("```json") {
        rest.split("```").next().unwrap_or(rest)
    } else if let Some((_, rest)) = text.split_once("```") {
        rest.split("```").next().unwrap_or(rest)
    } else {
        text
    };

    inner.trim()
}

/// Decode the JSON payload of a response, tolerating fences and prose
///
/// When the text is not pure JSON, every `open` position is tried in turn
/// and the first value satisfying `accept` wins; otherwise the first value
/// that parsed at all is returned so its shape error surfaces.
fn decode_payload<F>(text: &str, open: char, accept: F) -> Result<Value, GenerationError>
where
    F: Fn(&Value) -> bool,
{
    let stripped = strip_code_fence(text);

    let err = match serde_json::from_str::<Value>(stripped) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let mut first_parsed = None;
    for (start, _) in stripped.match_indices(open) {
        let mut values = serde_json::Deserializer::from_str(&stripped[start..]).into_iter::<Value>();
        if let Some(Ok(value)) = values.next() {
            if accept(&value) {
                return Ok(value);
            }
            first_parsed.get_or_insert(value);
        }
    }

    first_parsed.ok_or_else(|| GenerationError::Parse(err.to_string()))
}

fn is_customization(value: &Value) -> bool {
    value.get("customizedSequence").is_some()
}

fn is_string_array(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.iter().all(Value::is_string))
}

/// Require every element of a JSON array to be a string
fn string_elements(items: &[Value]) -> Result<Vec<String>, GenerationError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| GenerationError::InvalidShape(format!("element {i} is not a string")))
        })
        .collect()
}

fn check_len(len: usize, range: &RangeInclusive<usize>) -> Result<(), GenerationError> {
    if range.contains(&len) {
        Ok(())
    } else {
        Err(GenerationError::LengthOutOfRange {
            len,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Normalize a generated entry to snake_case
#[must_use]
pub fn normalize_entry(raw: &str) -> SequenceEntry {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        if c.is_whitespace() || c == '-' || c == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.extend(c.to_lowercase());
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Parse and validate a validate/customize response
pub fn parse_customization(text: &str) -> Result<Customization, GenerationError> {
    let value = decode_payload(text, '{', is_customization)?;
    let object = value
        .as_object()
        .ok_or_else(|| GenerationError::InvalidShape("expected a JSON object".to_string()))?;

    let approved = object
        .get("approved")
        .and_then(Value::as_bool)
        .ok_or_else(|| GenerationError::InvalidShape("missing boolean `approved`".to_string()))?;

    let items = object
        .get("customizedSequence")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            GenerationError::InvalidShape("missing array `customizedSequence`".to_string())
        })?;

    check_len(items.len(), &CUSTOMIZE_LEN)?;
    let customized_sequence = normalize_entries(&string_elements(items)?)?;

    let insights = object
        .get("insights")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(Customization {
        approved,
        customized_sequence,
        insights,
    })
}

/// Parse and validate a pure generation response
pub fn parse_generated_sequence(text: &str) -> Result<Vec<SequenceEntry>, GenerationError> {
    let items = parse_string_array(text)?;
    check_len(items.len(), &GENERATE_LEN)?;
    normalize_entries(&items)
}

/// Normalize every entry, rejecting those with no identifier left
fn normalize_entries(items: &[String]) -> Result<Vec<SequenceEntry>, GenerationError> {
    items
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let entry = normalize_entry(raw);
            if entry.is_empty() {
                Err(GenerationError::InvalidShape(format!("element {i} is blank")))
            } else {
                Ok(entry)
            }
        })
        .collect()
}

fn parse_string_array(text: &str) -> Result<Vec<String>, GenerationError> {
    let value = decode_payload(text, '[', is_string_array)?;
    let items = value
        .as_array()
        .ok_or_else(|| GenerationError::InvalidShape("expected a JSON array".to_string()))?;
    string_elements(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use pretty_assertions::assert_eq;

    mock! {
        Generator {}

        #[async_trait]
        impl TextGenerator for Generator {
            async fn complete(&self, request: GenerationRequest) -> Result<String, GenerationError>;
        }
    }

    fn mock_returning(text: &'static str) -> MockGenerator {
        let mut generator = MockGenerator::new();
        generator
            .expect_complete()
            .returning(move |_| Ok(text.to_string()));
        generator
    }

    #[test]
    fn strips_json_fence() {
        let text = "```json\n[\"a\", \"b\"]\n```";
        assert_eq!(strip_code_fence(text), "[\"a\", \"b\"]");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  [1]  "), "[1]");
    }

    #[test]
    fn normalizes_entries() {
        assert_eq!(normalize_entry("  Venue Booking "), "venue_booking");
        assert_eq!(normalize_entry("final-walk__through"), "final_walk_through");
        assert_eq!(normalize_entry("already_snake"), "already_snake");
    }

    #[test]
    fn customization_parses_fenced_object() {
        let text = r#"```json
{"approved": false, "customizedSequence": ["Scout Venues", "book_caterer", "send_invites"], "insights": "smaller venue"}
```"#;
        let parsed = parse_customization(text).unwrap();
        assert!(!parsed.approved);
        assert_eq!(
            parsed.customized_sequence,
            vec!["scout_venues", "book_caterer", "send_invites"]
        );
        assert_eq!(parsed.insights, "smaller venue");
    }

    #[test]
    fn customization_tolerates_surrounding_prose() {
        let text = r#"Here you go: {"approved": true, "customizedSequence": ["a_b", "c_d", "e_f"], "insights": ""} hope it helps"#;
        assert!(parse_customization(text).unwrap().approved);
    }

    #[test]
    fn customization_rejects_bad_shapes() {
        assert!(matches!(
            parse_customization(r#"{"approved": true, "customizedSequence": ["a", "b"]}"#),
            Err(GenerationError::LengthOutOfRange { len: 2, min: 3, max: 20 })
        ));
        assert!(matches!(
            parse_customization(r#"{"approved": "yes", "customizedSequence": ["a", "b", "c"]}"#),
            Err(GenerationError::InvalidShape(_))
        ));
        assert!(matches!(
            parse_customization(r#"{"approved": true, "customizedSequence": ["a", 2, "c"]}"#),
            Err(GenerationError::InvalidShape(_))
        ));
        assert!(matches!(
            parse_customization(r#"["a", "b", "c"]"#),
            Err(GenerationError::InvalidShape(_))
        ));
        assert!(matches!(
            parse_customization("no json here"),
            Err(GenerationError::Parse(_))
        ));
        assert!(matches!(
            parse_customization(r#"{"approved": false, "customizedSequence": ["venue", "  ", "party"]}"#),
            Err(GenerationError::InvalidShape(_))
        ));
    }

    #[test]
    fn blank_generated_entries_rejected() {
        assert!(matches!(
            parse_generated_sequence(r#"["  ", "---", "___"]"#),
            Err(GenerationError::InvalidShape(_))
        ));
        assert!(matches!(
            parse_generated_sequence(r#"["research", "-", "launch"]"#),
            Err(GenerationError::InvalidShape(_))
        ));
    }

    #[test]
    fn bracketed_prose_before_payload() {
        let seq = parse_generated_sequence(r#"Here are [3] steps: ["a_b", "c_d", "e_f"] enjoy"#).unwrap();
        assert_eq!(seq, vec!["a_b", "c_d", "e_f"]);

        let custom = parse_customization(
            r#"Notes {draft} follow: {"approved": true, "customizedSequence": ["x_y", "y_z", "z_w"]} done"#,
        )
        .unwrap();
        assert!(custom.approved);
        assert_eq!(custom.customized_sequence, vec!["x_y", "y_z", "z_w"]);
    }

    #[test]
    fn generated_sequence_length_bounds() {
        assert!(matches!(
            parse_generated_sequence(r#"["a"]"#),
            Err(GenerationError::LengthOutOfRange { len: 1, .. })
        ));

        let sixteen: Vec<String> = (0..16).map(|i| format!("\"stage_{}\"", "x".repeat(i + 1))).collect();
        let text = format!("[{}]", sixteen.join(","));
        assert!(matches!(
            parse_generated_sequence(&text),
            Err(GenerationError::LengthOutOfRange { len: 16, min: 3, max: 15 })
        ));

        let ok = parse_generated_sequence("```\n[\"research\", \"plan\", \"do\"]\n```").unwrap();
        assert_eq!(ok, vec!["research", "plan", "do"]);
    }

    #[tokio::test]
    async fn boundary_rejects_blank_response() {
        let boundary = GenerationBoundary::new(mock_returning("   "));
        let result = boundary
            .generate_sequence("open a bakery", &UserContext::new())
            .await;
        assert!(matches!(result, Err(GenerationError::EmptyResponse)));
    }

    #[tokio::test]
    async fn validate_request_carries_template_and_goal() {
        let mut generator = MockGenerator::new();
        generator
            .expect_complete()
            .withf(|req| {
                req.kind == RequestKind::ValidateCustomize
                    && req.prompt.contains("templateSequence")
                    && req.prompt.contains("venue_research_and_booking")
                    && req.prompt.contains("\"goalType\": \"wedding\"")
            })
            .times(1)
            .returning(|_| {
                Ok(r#"{"approved": true, "customizedSequence": ["a_a", "b_b", "c_c"], "insights": "ok"}"#
                    .to_string())
            });

        let boundary = GenerationBoundary::new(generator);
        let template = vec!["venue_research_and_booking".to_string()];
        let result = boundary
            .validate_and_customize(&template, &GoalType::Wedding, "small beach wedding", &UserContext::new())
            .await
            .unwrap();
        assert!(result.approved);
        assert_eq!(result.insights, "ok");
    }

    #[tokio::test]
    async fn disabled_generator_always_fails() {
        let boundary = GenerationBoundary::new(DisabledGenerator);
        let result = boundary.generate_sequence("anything", &UserContext::new()).await;
        assert!(matches!(result, Err(GenerationError::Config(_))));
    }
}
