use crate::TemplateError;

/// A compiled machinefile line template such as `%h%[:]C`.
///
/// Templates are literal text with `%` tokens filled in for each host:
///
/// | Token         | Output                                                        |
/// |---------------|---------------------------------------------------------------|
/// | `%%`          | a literal `%`                                                 |
/// | `%h`          | the host name                                                 |
/// | `%c`          | the task count                                                |
/// | `%C`          | the task count, or nothing if the count is 1 or less          |
/// | `%[<delim>]c` | `<delim>` followed by the task count                          |
/// | `%[<delim>]C` | `<delim>` and the task count, or nothing if the count is <= 1 |
///
/// Any other `%<x>` token, and a `%` at the very end, produce no output.
///
/// A template that contains no count token cannot express the task count inline. Such templates
/// are compiled with only `%%` and `%h` recognized, so `%[` is an unknown token there and the
/// rest of a would-be delimiter token is literal text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Template {
    tokens: Vec<Token>,
    has_count_token: bool,
}

impl Template {
    /// The template used when none is supplied: the host name, followed by `:<count>` when the
    /// host runs more than one task.
    pub const DEFAULT: &'static str = "%h%[:]C";

    /// Compiles a template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template uses count tokens and a `%[` delimiter is never closed.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let has_count_token = contains_count_token(template);

        let grammar = if has_count_token {
            Grammar::WithCounts
        } else {
            Grammar::HostOnly
        };

        let mut tokens: Vec<Token> = Vec::new();

        for token in Scanner::new(template, grammar) {
            let token = token?;

            if let Token::Literal(text) = &token {
                if let Some(Token::Literal(previous)) = tokens.last_mut() {
                    previous.push_str(text);
                    continue;
                }
            }

            tokens.push(token);
        }

        Ok(Self {
            tokens,
            has_count_token,
        })
    }

    /// Whether the template displays the task count itself (`%c`, `%C` or a delimited variant).
    #[must_use]
    pub fn has_count_token(&self) -> bool {
        self.has_count_token
    }

    /// Renders one line for a host, without a line terminator.
    #[must_use]
    pub fn render_line(&self, host: &str, count: u32) -> String {
        let mut line = String::new();

        for token in &self.tokens {
            match token {
                Token::Literal(text) => line.push_str(text),
                Token::Host => line.push_str(host),
                Token::Count {
                    delimiter,
                    optional,
                } => {
                    if !optional || count > 1 {
                        line.push_str(delimiter);
                        line.push_str(&count.to_string());
                    }
                }
            }
        }

        line
    }
}

/// Whether the template holds a count token anywhere, including after an unterminated `%[`.
fn contains_count_token(template: &str) -> bool {
    for token in Scanner::new(template, Grammar::WithCounts) {
        match token {
            Ok(Token::Count { .. }) => return true,
            Ok(_) => {}
            // The unterminated delimiter swallowed the rest of the template, which may still
            // hold a count token.
            Err(TemplateError::UnterminatedDelimiter { delimiter }) => {
                return contains_count_token(&delimiter);
            }
        }
    }

    false
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Token {
    Literal(String),
    Host,
    Count {
        delimiter: String,

        // `%C` style: shown only if the count is greater than one.
        optional: bool,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Grammar {
    WithCounts,
    HostOnly,
}

/// Splits a template into tokens, left to right.
#[derive(Debug)]
struct Scanner<'a> {
    rest: &'a str,
    grammar: Grammar,
}

impl<'a> Scanner<'a> {
    fn new(template: &'a str, grammar: Grammar) -> Self {
        Self {
            rest: template,
            grammar,
        }
    }

    fn literal(&mut self, len: usize) -> Token {
        let (text, rest) = self.rest.split_at(len);
        self.rest = rest;
        Token::Literal(text.to_string())
    }

    fn delimited_count(&mut self, after_open: &'a str) -> Option<Result<Token, TemplateError>> {
        let Some((delimiter, after_close)) = after_open.split_once(']') else {
            self.rest = "";
            return Some(Err(TemplateError::UnterminatedDelimiter {
                delimiter: after_open.to_string(),
            }));
        };

        let mut chars = after_close.chars();
        let optional = match chars.next() {
            Some('c') => false,
            Some('C') => true,
            _ => {
                // Unknown delimited token: dropped together with the character that follows `]`.
                self.rest = chars.as_str();
                return None;
            }
        };

        self.rest = chars.as_str();

        Some(Ok(Token::Count {
            delimiter: delimiter.to_string(),
            optional,
        }))
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token, TemplateError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.rest.find('%') {
                None if self.rest.is_empty() => return None,
                None => return Some(Ok(self.literal(self.rest.len()))),
                Some(0) => {}
                Some(len) => return Some(Ok(self.literal(len))),
            }

            let after_percent = self.rest.get(1..).unwrap_or_default();
            let mut chars = after_percent.chars();

            // A `%` at the end of the template is dropped.
            let Some(directive) = chars.next() else {
                self.rest = "";
                return None;
            };
            let after_directive = chars.as_str();
            self.rest = after_directive;

            let token = match (directive, self.grammar) {
                ('%', _) => Token::Literal("%".to_string()),
                ('h', _) => Token::Host,
                ('c', Grammar::WithCounts) => Token::Count {
                    delimiter: String::new(),
                    optional: false,
                },
                ('C', Grammar::WithCounts) => Token::Count {
                    delimiter: String::new(),
                    optional: true,
                },
                ('[', Grammar::WithCounts) => match self.delimited_count(after_directive) {
                    Some(result) => return Some(result),
                    None => continue,
                },
                // Unknown tokens are dropped.
                _ => continue,
            };

            return Some(Ok(token));
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn render(template: &str, host: &str, count: u32) -> String {
        Template::parse(template).unwrap().render_line(host, count)
    }

    #[test]
    fn count_tokens_are_detected() {
        assert!(Template::parse("%h %c").unwrap().has_count_token());
        assert!(Template::parse("%C").unwrap().has_count_token());
        assert!(Template::parse("%h%[:]C").unwrap().has_count_token());
        assert!(Template::parse("%[ slots=]c").unwrap().has_count_token());

        assert!(!Template::parse("%h").unwrap().has_count_token());
        assert!(!Template::parse("").unwrap().has_count_token());
        assert!(!Template::parse("%%c").unwrap().has_count_token());
        assert!(!Template::parse("%[:]x %h").unwrap().has_count_token());
    }

    #[test]
    fn inline_count_tokens() {
        assert_eq!(
            render("%h slots=%c maxslots=16", "n001", 4),
            "n001 slots=4 maxslots=16"
        );

        assert_eq!(render("%h%[:]C", "n000", 1), "n000");
        assert_eq!(render("%h%[:]C", "n000", 4), "n000:4");

        assert_eq!(render("%h%C", "n000", 1), "n000");
        assert_eq!(render("%h%C", "n000", 2), "n0002");

        assert_eq!(render("%h%[ x ]c", "n000", 1), "n000 x 1");
        assert_eq!(render("%h%[]c", "n000", 3), "n0003");
    }

    #[test]
    fn literal_percent_and_unknown_tokens() {
        assert_eq!(render("100%% %h%q!%", "n1", 2), "100% n1!");
        assert_eq!(render("%h%[:]z%c", "n1", 2), "n12");
        assert_eq!(render("%c%[:]", "n1", 2), "2");
    }

    #[test]
    fn count_free_template_treats_delimiter_as_unknown() {
        assert_eq!(render("%h%[:]x", "n1", 3), "n1:]x");
        assert_eq!(render("%h %[", "n1", 3), "n1 ");
    }

    #[test]
    fn unterminated_delimiter_is_error() {
        assert_eq!(
            Template::parse("%h%c%[:c").unwrap_err(),
            TemplateError::UnterminatedDelimiter {
                delimiter: ":c".to_string()
            }
        );
    }

    #[test]
    fn unterminated_delimiter_before_count_is_error() {
        assert_eq!(
            Template::parse("%h%[:%c").unwrap_err(),
            TemplateError::UnterminatedDelimiter {
                delimiter: ":%c".to_string()
            }
        );
        assert!(Template::parse("%[%[%C").is_err());

        // Without any count token the same text is count-free and compiles.
        assert_eq!(render("%h%[:%h", "n1", 3), "n1:n1");
    }

    #[test]
    fn adjacent_literals_are_merged() {
        let template = Template::parse("a%%b").unwrap();

        assert_eq!(template.tokens, vec![Token::Literal("a%b".to_string())]);
    }

    #[test]
    fn default_template_compiles() {
        let template = Template::parse(Template::DEFAULT).unwrap();

        assert!(template.has_count_token());
        assert_eq!(template.render_line("n000", 8), "n000:8");
    }
}
