//! Code block language mapping.

/// Language used when a fence has no language or an unsupported one.
pub const PLAIN_TEXT: &str = "plain text";

/// Languages accepted by the API for code blocks.
const SUPPORTED_LANGUAGES: &[&str] = &[
    "abap",
    "arduino",
    "bash",
    "basic",
    "c",
    "c#",
    "c++",
    "clojure",
    "coffeescript",
    "css",
    "dart",
    "diff",
    "docker",
    "elixir",
    "elm",
    "erlang",
    "f#",
    "flow",
    "fortran",
    "gherkin",
    "glsl",
    "go",
    "graphql",
    "groovy",
    "haskell",
    "html",
    "java",
    "javascript",
    "json",
    "julia",
    "kotlin",
    "latex",
    "less",
    "lisp",
    "livescript",
    "lua",
    "makefile",
    "markdown",
    "markup",
    "matlab",
    "mermaid",
    "nix",
    "objective-c",
    "ocaml",
    "pascal",
    "perl",
    "php",
    "plain text",
    "powershell",
    "prolog",
    "protobuf",
    "python",
    "r",
    "reason",
    "ruby",
    "rust",
    "sass",
    "scala",
    "scheme",
    "scss",
    "shell",
    "solidity",
    "sql",
    "swift",
    "typescript",
    "vb.net",
    "verilog",
    "vhdl",
    "visual basic",
    "webassembly",
    "xml",
    "yaml",
];

/// Extract the language from a fence info string (first word).
pub(crate) fn parse_fence_info(info: &str) -> Option<&str> {
    info.split_whitespace()
        .next()
        .map(|lang| lang.trim_start_matches('{').trim_end_matches('}'))
        .filter(|lang| !lang.is_empty())
}

/// Map a fence language to one the API accepts.
#[must_use]
pub fn api_language(fence_language: Option<&str>) -> &'static str {
    let Some(lang) = fence_language else {
        return PLAIN_TEXT;
    };
    let lang = lang.to_ascii_lowercase();
    let canonical = match lang.as_str() {
        "rs" => "rust",
        "js" | "jsx" | "mjs" | "cjs" | "node" => "javascript",
        "ts" | "tsx" => "typescript",
        "py" | "python3" => "python",
        "rb" => "ruby",
        "sh" | "zsh" | "console" | "shell-session" => "shell",
        "ps1" | "pwsh" => "powershell",
        "yml" => "yaml",
        "md" => "markdown",
        "cpp" | "cc" | "cxx" | "hpp" => "c++",
        "cs" | "csharp" => "c#",
        "fs" | "fsharp" => "f#",
        "golang" => "go",
        "dockerfile" | "containerfile" => "docker",
        "make" | "mk" => "makefile",
        "objc" | "objectivec" => "objective-c",
        "kt" | "kts" => "kotlin",
        "proto" => "protobuf",
        "htm" | "xhtml" => "html",
        "tex" => "latex",
        "wasm" | "wat" => "webassembly",
        "patch" => "diff",
        "text" | "txt" | "plain" | "plaintext" => PLAIN_TEXT,
        other => other,
    };
    SUPPORTED_LANGUAGES
        .iter()
        .find(|supported| **supported == canonical)
        .copied()
        .unwrap_or(PLAIN_TEXT)
}
