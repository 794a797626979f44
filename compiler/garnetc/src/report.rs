//! Plain-text rendering of diagnostics and query responses.

use garnet_core::{GlobalState, QueryResponse, ResponseKind, Type};
use garnet_diagnostic::Diagnostic;
use garnet_ir::Loc;

use crate::lsp::Position;

/// `path:line:column`, 1-based.
pub fn show_loc(gs: &GlobalState, loc: Loc) -> String {
    if !loc.exists() || !gs.file_exists(loc.file) {
        return "<unknown>".to_owned();
    }
    let pos = Position::from_offset(gs, loc.file, loc.begin());
    format!("{}:{}:{}", gs.file(loc.file).path(), pos.line + 1, pos.character + 1)
}

pub fn show_type(gs: &GlobalState, ty: Type) -> String {
    match ty {
        Type::Untyped => "T.untyped".to_owned(),
        Type::Instance(sym) => gs.show_symbol(sym),
        Type::ClassOf(sym) => format!("T.class_of({})", gs.show_symbol(sym)),
        Type::Nil => "NilClass".to_owned(),
    }
}

pub fn render_diagnostic(gs: &GlobalState, diag: &Diagnostic) -> String {
    let mut out = format!("{}: {diag}", show_loc(gs, diag.loc));
    for note in &diag.notes {
        out.push_str("\n  note: ");
        out.push_str(note);
    }
    out
}

/// One line describing a response, for hover output.
pub fn render_response(gs: &GlobalState, response: &QueryResponse) -> String {
    let at = show_loc(gs, response.loc);
    let label = response.kind.label();
    match response.kind {
        ResponseKind::MethodDef { symbol, .. } => format!("{at}: {label} {}", gs.show_symbol(symbol)),
        ResponseKind::Send {
            callee,
            name,
            receiver,
            result,
        } => {
            let target = if callee.exists() {
                gs.show_symbol(callee)
            } else {
                gs.show_name(name)
            };
            format!(
                "{at}: {label} {target} on {}: {}",
                show_type(gs, receiver),
                show_type(gs, result)
            )
        }
        ResponseKind::Constant { name, ty, .. }
        | ResponseKind::Field { name, ty, .. }
        | ResponseKind::Ident { name, ty } => {
            format!("{at}: {label} {}: {}", gs.show_name(name), show_type(gs, ty))
        }
        ResponseKind::Literal { ty } => format!("{at}: {label}: {}", show_type(gs, ty)),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use garnet_core::File;
    use garnet_diagnostic::ErrorCode;
    use garnet_ir::{FileRef, Span, SymbolRef};

    fn state() -> (GlobalState, FileRef) {
        let mut gs = GlobalState::new();
        let file = {
            let mut gs = gs.unfreeze_files();
            gs.enter_file(File::from_path("lib/a.rb", "class A\n  X\nend\n"))
        };
        (gs, file)
    }

    #[test]
    fn test_show_loc_is_one_based() {
        let (gs, file) = state();
        assert_eq!(show_loc(&gs, Loc::new(file, Span::new(10, 11))), "lib/a.rb:2:3");
        assert_eq!(show_loc(&gs, Loc::NONE), "<unknown>");
    }

    #[test]
    fn test_show_type() {
        let (gs, _) = state();
        assert_eq!(show_type(&gs, Type::Instance(SymbolRef::INTEGER)), "Integer");
        assert_eq!(show_type(&gs, Type::ClassOf(SymbolRef::STRING)), "T.class_of(String)");
        assert_eq!(show_type(&gs, Type::Untyped), "T.untyped");
    }

    #[test]
    fn test_render_diagnostic_with_notes() {
        let (gs, file) = state();
        let diag = Diagnostic::error(ErrorCode::E3001)
            .with_message("Unable to resolve constant `X`")
            .at(Loc::new(file, Span::new(10, 11)))
            .with_note("searched lexical scopes");
        assert_eq!(
            render_diagnostic(&gs, &diag),
            "lib/a.rb:2:3: error [E3001]: Unable to resolve constant `X`\n  note: searched lexical scopes"
        );
    }
}
