// Benchmark helpers - each bench target compiles this module separately, so
// not every function is used by every target.
#[allow(dead_code)]
pub fn generate_markdown(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with *some* content and a [link](https://example.com).\n\n- Bullet point\n  - Nested item\n- Another item\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}
