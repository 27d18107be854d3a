//! Script and stylesheet minification (oxc, lightningcss).
//!
//! Minifiers report failure as `None`; the caller decides what to do with
//! the original text.

use std::path::Path;

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsOptions {
    /// Remove `console.*` calls.
    pub drop_console: bool,
}

/// Minifiable asset kinds, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Script,
    Stylesheet,
}

impl AssetKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "js" => Some(Self::Script),
            "css" => Some(Self::Stylesheet),
            _ => None,
        }
    }

    pub fn minify(self, content: &str, options: JsOptions) -> Option<String> {
        match self {
            Self::Script => minify_js(content, options),
            Self::Stylesheet => minify_css(content),
        }
    }
}

/// Compressed, mangled JavaScript with every comment removed.
pub fn minify_js(source: &str, options: JsOptions) -> Option<String> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, SourceType::mjs()).parse();
    if parsed.panicked || !parsed.errors.is_empty() {
        return None;
    }

    let mut program = parsed.program;
    let compress = CompressOptions {
        drop_console: options.drop_console,
        ..CompressOptions::smallest()
    };
    let minified = Minifier::new(MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(compress),
    })
    .minify(&allocator, &mut program);

    let codegen = CodegenOptions {
        minify: true,
        comments: CommentOptions::disabled(),
        ..CodegenOptions::default()
    };
    let output = Codegen::new()
        .with_options(codegen)
        .with_scoping(minified.scoping)
        .build(&program);
    Some(output.code)
}

pub fn minify_css(source: &str) -> Option<String> {
    let sheet = StyleSheet::parse(source, ParserOptions::default()).ok()?;
    let printer = PrinterOptions {
        minify: true,
        ..PrinterOptions::default()
    };
    sheet.to_css(printer).ok().map(|css| css.code)
}

/// Minify by extension. `None` for unknown extensions and rejected input.
pub fn minify_by_ext(path: &Path, content: &str, options: JsOptions) -> Option<String> {
    AssetKind::from_path(path)?.minify(content, options)
}

/// `true` for `*.min.js` / `*.min.css` style names.
pub fn is_preminified(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(".min"))
}
