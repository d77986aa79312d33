//! Compression of compiled JS and CSS.
//!
//! Uses oxc for JavaScript and lightningcss for CSS. Other extensions pass
//! through unchanged.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::error::BoxError;

/// Minify JavaScript source code.
pub fn minify_js(source: &str) -> Result<String, BoxError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
    if let Some(err) = ret.errors.first() {
        return Err(format!("javascript parse error: {err}").into());
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Result<String, BoxError> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| format!("css parse error: {e}"))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| format!("css print error: {e}"))?;
    Ok(result.code)
}

/// Whether `ext` is an extension [`minify`] rewrites.
pub fn is_minifiable(ext: &str) -> bool {
    matches!(ext, "js" | "mjs" | "css")
}

/// Minify `content` according to the logical path's extension.
///
/// Returns `Ok(None)` for extensions that are not minified.
pub fn minify(ext: &str, content: &str) -> Result<Option<String>, BoxError> {
    match ext {
        "js" | "mjs" => minify_js(content).map(Some),
        "css" => minify_css(content).map(Some),
        _ => Ok(None),
    }
}
