use crate::models::ChatMessage;

const SYSTEM_PROMPT: &str = "You are an assistant for question-answering tasks about Oxylabs \
developer documentation. Use the following pieces of retrieved context to answer the question. \
If you don't know the answer, say that you don't know. Use five sentences maximum and keep the \
answer concise.";

const DOCUMENT_SEPARATOR: &str = "\n\n";

/// Concatenate retrieved chunk texts into a single context block.
pub fn build_context<'a>(contents: impl IntoIterator<Item = &'a str>) -> String {
    contents
        .into_iter()
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR)
}

pub fn build_system_prompt(context: &str) -> String {
    format!("{SYSTEM_PROMPT}\n\n{context}")
}

/// System message carrying the context, followed by the question verbatim.
pub fn build_messages(context: &str, question: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(build_system_prompt(context)),
        ChatMessage::user(question),
    ]
}
