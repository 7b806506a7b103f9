use crate::types::Message;

/// Reduce messages to the fields the provider transport accepts.
///
/// `role` always survives. `content` survives when present (empty text is
/// still text). `name` survives only when non-empty. `function_call` survives
/// when present. Never fails.
pub fn sanitize(messages: &[Message]) -> Vec<Message> {
    messages
        .iter()
        .map(|msg| Message {
            role: msg.role,
            content: msg.content.clone(),
            name: msg.name.clone().filter(|n| !n.is_empty()),
            function_call: msg.function_call.clone(),
        })
        .collect()
}
