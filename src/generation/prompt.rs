//! Prompt assembly for grounded answers.

/// Builds the user turn from the retrieved context and the question.
pub fn build_user_prompt(context: &str, question: &str) -> String {
    format!("CONTEXTO:\n{context}\n\nPERGUNTA:\n{question}")
}

/// Recovers the question from a prompt built by [`build_user_prompt`].
pub fn question_from_prompt(user_prompt: &str) -> &str {
    user_prompt
        .rsplit_once("PERGUNTA:\n")
        .map_or(user_prompt, |(_, question)| question)
}
