use camino::Utf8PathBuf;
use salsa::{Accumulator as _, Database};
use smithy_errors::Diagnostic;
use smithy_parse::ParseOptions;

#[salsa::input(debug)]
pub struct File {
    #[returns(ref)]
    pub path: Utf8PathBuf,
    #[returns(deref)]
    pub text: String,
    pub max_depth: usize,
}

#[salsa::tracked]
pub fn check_file(db: &dyn Database, file: File) {
    let options = ParseOptions { max_depth: file.max_depth(db) };
    let parse = smithy_parse::parse_with(file.path(db).as_str(), file.text(db), &options);

    for diagnostic in parse.diagnostics() {
        diagnostic.accumulate(db);
    }
}
