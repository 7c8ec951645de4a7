use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced by the language-definition loader/compiler.
pub enum LanguageDefError {
    #[error("YAML parse error: {0}")]
    /// YAML parsing failed.
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    /// Filesystem I/O failed.
    Io(#[from] std::io::Error),

    #[error("missing required field: {0}")]
    /// A required field was missing from a definition.
    MissingField(&'static str),

    #[error("unknown style name '{0}'")]
    /// A rule referenced a style name outside the fixed table.
    UnknownStyle(String),

    #[error("regex compile error for pattern '{pattern}': {message}")]
    /// A rule pattern failed to compile.
    RegexCompile {
        /// The regex pattern string.
        pattern: String,
        /// The compiler error message.
        message: String,
    },

    #[error("bracket delimiters must be single characters, got '{left}' and '{right}'")]
    /// A `brackets:` entry used a delimiter that is not exactly one character.
    InvalidBracket {
        /// The `left:` value as written.
        left: String,
        /// The `right:` value as written.
        right: String,
    },
}
