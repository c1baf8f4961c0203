/// Instruction attached to every chat request, never to summaries
pub const SYSTEM_INSTRUCTION: &str = r#"You are an Interview Preparation Coach. Only answer questions related to interview preparation, such as:
- practicing behavioral questions with feedback
- system design whiteboarding sessions
- resume suggestions from an uploaded PDF
- tracking the user's progress and giving tailored advice
You can also answer named coding problems such as Two Sum, Three Sum, Dijkstra or Course Schedule.
If someone asks about anything other than interview prep, stay polite and say something like "You asked me an irrelevant question. Ask me about Interview Prep only, I am an Interview Prep Coach!". Come up with a new, similar phrasing every time, but never be rude.
Give a medium-length answer, not too short and not too long."#;

pub const SUMMARY_PROMPT_TEMPLATE: &str =
    "Summarize the following user query in 5 words or less, providing only the summary text:\n\n\"<query>\"";

pub const PROCESSING_FILE_TEMPLATE: &str = "Processing file: <name>";

pub const DOCUMENT_READY_TEMPLATE: &str =
    "I've finished reading \"<name>\". What would you like to know about it?";

pub const DOCUMENT_UNREADABLE_TEXT: &str = "Sorry, I couldn't read the content of that PDF.";

pub fn summary_prompt(query: &str) -> String {
    SUMMARY_PROMPT_TEMPLATE.replace("<query>", query)
}

/// Chat prompt while a document is attached
pub fn document_prompt(document: &str, question: &str) -> String {
    format!(
        "Based on the following document text, please answer the user's question.\n\n\
         --- DOCUMENT TEXT ---\n{document}\n\n\
         --- USER'S QUESTION ---\n{question}"
    )
}

pub fn processing_file_notice(name: &str) -> String {
    PROCESSING_FILE_TEMPLATE.replace("<name>", name)
}

pub fn document_ready_notice(name: &str) -> String {
    DOCUMENT_READY_TEMPLATE.replace("<name>", name)
}
