use std::fmt;

/// The editor request a query is made for. Only used in messages and spans.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LspMethod {
    Hover,
    Definition,
    References,
}

impl LspMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            LspMethod::Hover => "textDocument/hover",
            LspMethod::Definition => "textDocument/definition",
            LspMethod::References => "textDocument/references",
        }
    }
}

impl fmt::Display for LspMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
