use crate::definition::{LanguageDefinition, RawBlockRule, RawBracket, RawIndentUnit, RawRule};
use crate::error::LanguageDefError;
use codeedit_highlight_regex::{
    BlockRule, HighlightRules, Rule, STYLE_COMMENT, STYLE_DECORATOR, STYLE_FUNCTION, STYLE_KEYWORD,
    STYLE_NUMBER, STYLE_PREPROCESSOR, STYLE_STRING, STYLE_TYPE, StyleId,
};
use codeedit_lang::{
    BlockMarkers, BracketPair, CommentConfig, IndentUnit, LanguageConfig, default_pairs,
};
use regex::Regex;
use std::path::Path;

#[derive(Debug, Clone)]
/// A compiled language definition.
///
/// Bundles the editing configuration consumed by the engine kernel with the
/// rule table consumed by the incremental classifier.
pub struct Language {
    /// Editing configuration (comments, indent, bracket pairs).
    pub config: LanguageConfig,
    /// Compiled classification rules.
    pub highlight: HighlightRules,
}

impl Language {
    /// Compile a parsed [`LanguageDefinition`].
    ///
    /// Compilation is all-or-nothing: the first invalid entry fails the whole
    /// definition and nothing is produced.
    pub fn compile(definition: LanguageDefinition) -> Result<Self, LanguageDefError> {
        if definition.name.is_empty() {
            return Err(LanguageDefError::MissingField("name"));
        }

        let comments = CommentConfig {
            line: definition.line_comment,
            block: definition
                .block_comment
                .map(|(start, end)| BlockMarkers { start, end }),
        };

        let indent = match definition.indent {
            Some(raw) => match raw.unit {
                RawIndentUnit::Tab => IndentUnit::Tab,
                RawIndentUnit::Spaces => IndentUnit::Spaces(raw.width),
            },
            None => IndentUnit::default(),
        };

        let pairs = match definition.brackets {
            Some(raw) => raw
                .into_iter()
                .map(compile_bracket)
                .collect::<Result<Vec<_>, _>>()?,
            None => default_pairs(),
        };

        let rules = definition
            .rules
            .into_iter()
            .map(compile_rule)
            .collect::<Result<Vec<_>, _>>()?;

        let block_rules = definition
            .block_rules
            .into_iter()
            .map(compile_block_rule)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config: LanguageConfig {
                name: definition.name,
                comments,
                indent,
                pairs,
            },
            highlight: HighlightRules::new(rules, block_rules),
        })
    }

    /// Load and compile a definition from a YAML string.
    pub fn load_from_str(yaml: &str) -> Result<Self, LanguageDefError> {
        let definition: LanguageDefinition = serde_yaml::from_str(yaml)?;
        Self::compile(definition)
    }

    /// Load and compile a definition from a filesystem path.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, LanguageDefError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::load_from_str(&yaml)
    }
}

/// Map a style name used in definition files to its [`StyleId`].
///
/// The table covers the same identifiers the built-in grammars in
/// `codeedit-highlight-regex` use.
pub fn style_id(name: &str) -> Result<StyleId, LanguageDefError> {
    match name {
        "keyword" => Ok(STYLE_KEYWORD),
        "type" => Ok(STYLE_TYPE),
        "string" => Ok(STYLE_STRING),
        "number" => Ok(STYLE_NUMBER),
        "comment" => Ok(STYLE_COMMENT),
        "function" => Ok(STYLE_FUNCTION),
        "preprocessor" => Ok(STYLE_PREPROCESSOR),
        "decorator" => Ok(STYLE_DECORATOR),
        _ => Err(LanguageDefError::UnknownStyle(name.to_string())),
    }
}

fn compile_bracket(raw: RawBracket) -> Result<BracketPair, LanguageDefError> {
    let (Some(left), Some(right)) = (single_char(&raw.left), single_char(&raw.right)) else {
        return Err(LanguageDefError::InvalidBracket {
            left: raw.left,
            right: raw.right,
        });
    };

    Ok(BracketPair {
        left,
        right,
        auto_complete: raw.auto_complete,
        auto_remove: raw.auto_remove,
        tab_jump_out: raw.tab_jump_out,
    })
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let first = chars.next()?;
    chars.next().is_none().then_some(first)
}

fn compile_rule(raw: RawRule) -> Result<Rule, LanguageDefError> {
    let style = style_id(&raw.style)?;
    let rule = Rule::new(&raw.pattern, style).map_err(|e| LanguageDefError::RegexCompile {
        pattern: raw.pattern.clone(),
        message: e.to_string(),
    })?;

    Ok(match raw.group {
        Some(group) => rule.with_capture_group(group),
        None => rule,
    })
}

fn compile_block_rule(raw: RawBlockRule) -> Result<BlockRule, LanguageDefError> {
    let style = style_id(&raw.style)?;
    match BlockRule::new(&raw.start, &raw.end, style) {
        Ok(rule) => Ok(rule),
        Err(e) => {
            // Recompile the start pattern alone to learn which side failed.
            let pattern = if Regex::new(&raw.start).is_err() {
                raw.start
            } else {
                raw.end
            };
            Err(LanguageDefError::RegexCompile {
                pattern,
                message: e.to_string(),
            })
        }
    }
}
