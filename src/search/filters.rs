//! Validated glob/type filter sets for engine invocations.

/// File type tokens the engine recognizes (ripgrep's `--type-list` names).
/// Tokens outside this vocabulary are dropped, not rejected.
pub const RECOGNIZED_TYPES: &[&str] = &[
    "agda", "aidl", "amake", "asciidoc", "asm", "asp", "ats", "avro", "awk", "bat", "bazel",
    "bitbake", "brotli", "buildstream", "bzip2", "c", "cabal", "candid", "carp", "cbor", "ceylon",
    "clojure", "cmake", "cobol", "coffeescript", "config", "coq", "cpp", "creole", "crystal",
    "cs", "csharp", "cshtml", "css", "csv", "cuda", "cython", "d", "dart", "devicetree", "dhall",
    "diff", "dita", "docker", "dockercompose", "dts", "dvc", "ebuild", "edn", "elisp", "elixir",
    "elm", "erb", "erlang", "fennel", "fidl", "fish", "flatbuffers", "fortran", "fsharp", "gap",
    "gn", "go", "gradle", "graphql", "groovy", "gzip", "h", "haml", "hare", "haskell", "hbs",
    "hs", "html", "hy", "idris", "janet", "java", "jinja", "jl", "js", "json", "jsonl", "julia",
    "jupyter", "k", "kotlin", "lean", "less", "license", "lilypond", "lisp", "lock", "log", "lua",
    "lz4", "lzma", "m4", "make", "mako", "man", "markdown", "matlab", "md", "meson", "minified",
    "mint", "mk", "ml", "motoko", "msbuild", "nim", "nix", "objc", "objcpp", "ocaml", "org",
    "pascal", "pdf", "perl", "php", "po", "pod", "postscript", "protobuf", "ps", "puppet",
    "purs", "py", "python", "qmake", "qml", "r", "racket", "raku", "rdoc", "readme", "reasonml",
    "red", "rescript", "robot", "rst", "ruby", "rust", "sass", "scala", "sh", "slim", "smarty",
    "sml", "solidity", "soy", "spark", "spec", "sql", "stylus", "sv", "svelte", "svg", "swift",
    "swig", "systemd", "taskpaper", "tcl", "tex", "texinfo", "textile", "tf", "thrift", "toml",
    "ts", "twig", "typescript", "typoscript", "usd", "v", "vala", "vb", "vcl", "verilog", "vhdl",
    "vim", "vimscript", "vue", "webidl", "wiki", "xml", "xz", "yacc", "yaml", "yang", "zig",
    "zsh", "zstd",
];

const EXCLUDE_BINARY_TYPES: &[&str] = &[
    "avro", "brotli", "bzip2", "cbor", "flatbuffers", "gzip", "lz4", "lzma", "pdf", "protobuf",
    "thrift", "xz", "zstd",
];

const EXCLUDE_EXTRA_TYPES: &[&str] = &[
    "lock", "minified", "jupyter", "log", "postscript", "svg", "usd",
];

/// Type tokens a caller may want to exclude by default (binary formats, lock
/// files, and similar noise). Offered as an opt-in convenience only; it is
/// never applied automatically to a query.
pub fn default_excluded_types() -> Vec<&'static str> {
    let mut types: Vec<&'static str> = EXCLUDE_BINARY_TYPES
        .iter()
        .chain(EXCLUDE_EXTRA_TYPES)
        .copied()
        .collect();
    types.sort_unstable();
    types
}

/// A validated set of glob and type filters, ready to translate into engine
/// arguments. Absent lists are empty; no filters are ever added implicitly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    pub include_globs: Vec<String>,
    pub exclude_globs: Vec<String>,
    pub include_types: Vec<String>,
    pub exclude_types: Vec<String>,
}

impl FilterSet {
    pub fn build(
        include_globs: Vec<String>,
        exclude_globs: Vec<String>,
        include_types: Vec<String>,
        exclude_types: Vec<String>,
    ) -> Self {
        Self {
            include_globs,
            exclude_globs,
            include_types: retain_recognized(include_types),
            exclude_types: retain_recognized(exclude_types),
        }
    }

    /// Append `--glob` / `-t` / `-T` arguments to an engine command line.
    pub fn apply(&self, cmd: &mut tokio::process::Command) {
        for glob in &self.include_globs {
            cmd.arg("--glob").arg(glob);
        }
        for glob in &self.exclude_globs {
            cmd.arg("--glob").arg(format!("!{glob}"));
        }
        for t in &self.include_types {
            cmd.arg("-t").arg(t);
        }
        for t in &self.exclude_types {
            cmd.arg("-T").arg(t);
        }
    }
}

fn retain_recognized(mut types: Vec<String>) -> Vec<String> {
    types.retain(|t| {
        let known = RECOGNIZED_TYPES.contains(&t.as_str());
        if !known {
            tracing::debug!("Dropping unrecognized type token {t:?}");
        }
        known
    });
    types
}
