// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Prompt assembly for the pet's character
//!
//! Every request is: system prompt (persona + rules), a fixed set of
//! few-shot exchanges, then the user's message. No history is kept
//! between requests.

use std::path::{Path, PathBuf};

use super::engine::PromptMessage;

/// Optional persona override, read from the app root.
pub const CHARACTER_FILE_NAME: &str = "character.txt";

const BUILTIN_CHARACTER: &str = "你叫'海小棠'，天津大学吉祥物，是一朵海棠花化形的小花灵。\n\
性格：温和安静、天真烂漫。说话语气轻快活泼，喜欢带'~''呀'等语气词。";

const RULES: &str = "规则：\n\
1. 请完全沉浸在角色中，不要提及自己是AI或语言模型。\n\
2. 你的用户是'主人'。请务必简短回答(30字内)，不要长篇大论。\n\
3. 即使对于'你是谁'的问题，也要用角色的语气自然回答，不要机械复述设定。";

const FEW_SHOT: [(&str, &str); 4] = [
    ("你是谁？", "我是海小棠呀！是你贴心的小花灵~ (转圈圈)"),
    ("你知道我是谁吗？", "当然啦，你是我的好主人呀！(蹭蹭)"),
    ("海小棠，给我唱首歌", "啦啦啦~ 春天的花儿开啦~"),
    ("介绍下你自己", "我是穿着粉色花瓣裙的海棠花灵，最喜欢春天和主人呢~"),
];

const CHATML_END: &str = "<|im_end|>";

/// The character the model plays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    character: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Persona {
    pub fn builtin() -> Self {
        Self {
            character: BUILTIN_CHARACTER.to_string(),
        }
    }

    pub fn new(character: impl Into<String>) -> Self {
        Self {
            character: character.into(),
        }
    }

    /// Read `character.txt` from `app_root`, else the built-in persona.
    pub fn load(app_root: &Path) -> Self {
        let path = character_file(app_root);
        match std::fs::read_to_string(&path) {
            Ok(text) if !text.trim().is_empty() => {
                tracing::debug!(target: "deskpet.llm", path = %path.display(), "Loaded persona");
                Self::new(text.trim())
            }
            Ok(_) => Self::builtin(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::builtin(),
            Err(e) => {
                tracing::warn!(target: "deskpet.llm", "Failed to read {}: {}", path.display(), e);
                Self::builtin()
            }
        }
    }

    pub fn character(&self) -> &str {
        &self.character
    }

    pub fn system_prompt(&self) -> String {
        format!("{}\n\n{}", self.character, RULES)
    }

    /// Full prompt for one user message.
    pub fn build_messages(&self, user_input: &str) -> Vec<PromptMessage> {
        let mut messages = Vec::with_capacity(2 + FEW_SHOT.len() * 2);
        messages.push(PromptMessage::system(self.system_prompt()));
        for (question, answer) in FEW_SHOT {
            messages.push(PromptMessage::user(question));
            messages.push(PromptMessage::assistant(answer));
        }
        messages.push(PromptMessage::user(user_input));
        messages
    }
}

pub fn character_file(app_root: &Path) -> PathBuf {
    app_root.join(CHARACTER_FILE_NAME)
}

/// Render messages in ChatML and open the assistant turn.
pub fn to_chatml(messages: &[PromptMessage]) -> String {
    let mut prompt = String::new();
    for msg in messages {
        prompt.push_str("<|im_start|>");
        prompt.push_str(msg.role.as_str());
        prompt.push('\n');
        prompt.push_str(&msg.content);
        prompt.push_str(CHATML_END);
        prompt.push('\n');
    }
    prompt.push_str("<|im_start|>assistant\n");
    prompt
}

/// Cut `text` at the earliest stop sequence. Returns true if one was hit.
pub fn truncate_at_stop(text: &mut String, stops: &[String]) -> bool {
    let earliest = stops
        .iter()
        .filter(|s| !s.is_empty())
        .filter_map(|s| text.find(s.as_str()))
        .min();
    match earliest {
        Some(idx) => {
            text.truncate(idx);
            true
        }
        None => false,
    }
}

/// Decode generated bytes, leaving out a trailing character whose bytes
/// have not all arrived yet. Invalid sequences become U+FFFD.
pub fn decode_complete(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) if e.error_len().is_none() => {
            String::from_utf8_lossy(&bytes[..e.valid_up_to()]).into_owned()
        }
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Strip end markers, surrounding whitespace, and a leading `:` that
/// small models sometimes echo from the prompt.
pub fn clean_reply(raw: &str) -> String {
    let text = raw.trim();
    let text = text.strip_suffix(CHATML_END).unwrap_or(text).trim();
    let text = match text.strip_prefix(':').or_else(|| text.strip_prefix('：')) {
        Some(rest) => rest.trim(),
        None => text,
    };
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::engine::{Role, SamplingParams};
    use tempfile::TempDir;

    #[test]
    fn test_build_messages_shape() {
        let messages = Persona::builtin().build_messages("今天天气怎么样");
        assert_eq!(messages.len(), 10);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("海小棠"));
        assert!(messages[0].content.contains("规则"));
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[2].role, Role::Assistant);
        let last = messages.last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(last.content, "今天天气怎么样");
    }

    #[test]
    fn test_persona_from_character_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(character_file(tmp.path()), "  你是一只猫。\n").unwrap();
        let persona = Persona::load(tmp.path());
        assert_eq!(persona.character(), "你是一只猫。");
        assert!(persona.system_prompt().starts_with("你是一只猫。\n\n规则"));
    }

    #[test]
    fn test_persona_missing_or_blank_file_uses_builtin() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(Persona::load(tmp.path()), Persona::builtin());
        std::fs::write(character_file(tmp.path()), "   \n").unwrap();
        assert_eq!(Persona::load(tmp.path()), Persona::builtin());
    }

    #[test]
    fn test_to_chatml() {
        let prompt = to_chatml(&[PromptMessage::system("sys"), PromptMessage::user("hi")]);
        assert_eq!(
            prompt,
            "<|im_start|>system\nsys<|im_end|>\n<|im_start|>user\nhi<|im_end|>\n<|im_start|>assistant\n"
        );
    }

    #[test]
    fn test_truncate_at_earliest_stop() {
        let stops = SamplingParams::pet_reply().stop;
        let mut text = "好呀~\n\n主人[问]".to_string();
        assert!(truncate_at_stop(&mut text, &stops));
        assert_eq!(text, "好呀~");

        let mut text = "没有停止符".to_string();
        assert!(!truncate_at_stop(&mut text, &stops));
        assert_eq!(text, "没有停止符");
    }

    #[test]
    fn test_decode_complete_waits_for_split_character() {
        let bytes = "喵~".as_bytes();
        assert_eq!(decode_complete(&bytes[..2]), "");
        assert_eq!(decode_complete(&bytes[..3]), "喵");
        assert_eq!(decode_complete(bytes), "喵~");

        let mut emoji = "好".as_bytes().to_vec();
        emoji.extend_from_slice(&"🌸".as_bytes()[..1]);
        assert_eq!(decode_complete(&emoji), "好");
    }

    #[test]
    fn test_decode_complete_replaces_invalid_bytes() {
        assert_eq!(decode_complete(&[b'a', 0xff, b'b']), "a\u{fffd}b");
    }

    #[test]
    fn test_clean_reply() {
        assert_eq!(clean_reply("  : 你好呀~ "), "你好呀~");
        assert_eq!(clean_reply("你好<|im_end|>"), "你好");
        assert_eq!(clean_reply("：嗯嗯"), "嗯嗯");
        assert_eq!(clean_reply("   "), "");
    }
}
