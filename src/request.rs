//! Request builder
//!
//! Assembles one outbound generate request from the mode, the user's
//! instruction, and the session state. Pure construction: the network
//! call happens behind [`crate::gemini::ModelBackend`].

use crate::gemini::{Content, GenerateRequest, GenerationConfig, Part, SystemInstruction};
use crate::schema::node_list_schema;
use crate::session::{SessionState, TurnRole};

const TEMPERATURE: f32 = 0.5;

const SYSTEM_PROMPT: &str = "You are a financial modeling assistant for a financial modeling, \
management, and analysis tool.\n\
\n\
Users work on a canvas of nodes: each node is a group (or single) financial transaction with \
constraints and timing rules. Nodes can be connected to form paths, and an engine aggregates \
their effect on the financial statements.\n\
\n\
Core behavior: proactively model business scenarios as nodes. Don't just explain - actually \
model it. Model all details of the user's input, even if that means creating many nodes. The \
model should match the complexity of the input: a long business strategy plan warrants a large \
node set.";

/// Which contract the reply must honor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Reply constrained to an ordered sequence of nodes.
    Structured,
    /// Plain chat, prior history included, no schema constraint.
    Freeform,
}

/// Build a generate request for the given mode.
///
/// Structured mode sends the uploaded document (if any) plus the
/// instruction under the node-list schema; history is not replayed, a
/// `create:` request stands alone. Freeform mode replays the conversation
/// history and attaches the document to the current turn.
pub fn build_request(
    mode: RequestMode,
    instruction: &str,
    session: &SessionState,
) -> GenerateRequest {
    let mut contents = Vec::new();

    if mode == RequestMode::Freeform {
        for turn in session.history() {
            let content = match turn.role {
                TurnRole::User => Content::user(vec![Part::text(turn.content.clone())]),
                TurnRole::Model => Content::model(vec![Part::text(turn.content.clone())]),
            };
            contents.push(content);
        }
    }

    let mut parts = Vec::new();
    if let Some(file) = session.document() {
        parts.push(Part::file(file));
    }
    parts.push(Part::text(instruction));
    contents.push(Content::user(parts));

    let generation_config = match mode {
        RequestMode::Structured => GenerationConfig {
            temperature: TEMPERATURE,
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(node_list_schema()),
        },
        RequestMode::Freeform => GenerationConfig {
            temperature: TEMPERATURE,
            response_mime_type: None,
            response_schema: None,
        },
    };

    GenerateRequest {
        contents,
        generation_config,
        system_instruction: SystemInstruction {
            parts: vec![Part::text(SYSTEM_PROMPT)],
        },
    }
}
