//! Instruction text sent to the generative model.

/// Asked locally when a prompt is too short to send anywhere.
pub const DEFAULT_CLARIFYING_QUESTION: &str =
    "Could you tell us a little more about the style you have in mind?";

pub const DEFAULT_CLARIFYING_EXAMPLES: [&str; 3] = [
    "A casual look for a weekend date",
    "A formal office outfit for an important meeting",
    "A comfortable dress for a beach holiday",
];

/// Used when the model says the prompt is vague but gives no usable question.
pub const GENERIC_CLARIFYING_QUESTION: &str =
    "Your request is a bit vague. Please add more detail.";

#[must_use]
pub fn validation_prompt(prompt: &str) -> String {
    format!(
        r#"Decide whether this fashion styling request is specific enough: "{prompt}".

1. If the request is specific (the occasion, place or desired style is clear), answer with exactly "YES".
2. If it is too vague, return a JSON object with one follow-up question that would clarify the user's intent and three example answers.

JSON format:
```json
{{
  "question": "question for the user",
  "examples": ["example answer 1", "example answer 2", "example answer 3"]
}}
```

Return only "YES" or the JSON object, with no other explanation."#
    )
}

#[must_use]
pub fn style_proposal_prompt(prompt: &str) -> String {
    format!(
        r#"You are a world-class fashion stylist working from a user's photo and request.

Analyse the attached photo for body shape and overall mood, and read the request: "{prompt}".

Propose one outfit that suits the person, fits the occasion they mention, keeps a consistent style and uses trendy items that can actually be bought.

Reply with a single paragraph describing only the clothes, shoes and accessories. No greeting and no other commentary."#
    )
}

#[must_use]
pub fn image_generation_prompt(description: &str, prompt: &str) -> String {
    format!(
        r#"Create a professional fashion editorial image from the user's original photo and the outfit below.

Outfit: "{description}"

Rules:
1. Keep the person exactly as they are, including the face, body shape and skin tone.
2. Replace only the clothing with the outfit described above.
3. Replace the background with a new, realistic scene that matches the request "{prompt}".
4. Change the pose to a natural, confident model pose.
5. Output a single high-quality image and no text."#
    )
}

#[must_use]
pub fn crop_prompt(product_name: &str, category: &str) -> String {
    format!(
        r"Find the '{product_name}' ({category}) the model is wearing in this image and return a close-up crop that shows it clearly. Output only the cropped image, with no text."
    )
}

/// Joins a clarification answer onto the original prompt.
#[must_use]
pub fn with_answer(prompt: &str, answer: &str) -> String {
    format!("{prompt}\n\nAdditional information: {answer}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_answer_appends_block() {
        assert_eq!(
            with_answer("clothes", "A casual look for a weekend date"),
            "clothes\n\nAdditional information: A casual look for a weekend date"
        );
    }

    #[test]
    fn validation_prompt_quotes_request() {
        let text = validation_prompt("outfit for a wedding");
        assert!(text.contains("\"outfit for a wedding\""));
        assert!(text.contains("\"question\""));
    }
}
