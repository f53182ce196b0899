//! Standalone HTML page embedding rendered tables.

use tablestylelib::output::escape_html;

/// One rendered definition: its title, the source it was built from and the
/// `<table>` fragment.
#[derive(Debug, Clone)]
pub struct Section {
    pub title: String,
    pub source: String,
    pub table: String,
}

/// Render a self-contained page listing each table under its source.
pub fn render_document(title: &str, sections: &[Section]) -> String {
    let body: String = sections.iter().map(render_section).collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/fomantic-ui@2.9.3/dist/semantic.min.css">
    <style>{css}</style>
</head>
<body>
    <div class="ui container">
        <h1 class="ui header">{title}</h1>
{body}
    </div>
</body>
</html>
"#,
        title = escape_html(title),
        css = inline_css(),
        body = body,
    )
}

fn render_section(section: &Section) -> String {
    format!(
        r#"        <section class="example">
            <h2 class="ui header">{title}</h2>
            <pre><code>{source}</code></pre>
{table}
        </section>
"#,
        title = escape_html(&section.title),
        source = escape_html(&section.source),
        table = section.table,
    )
}

fn inline_css() -> &'static str {
    r#"
        body { padding: 2em 0; }
        section.example { margin-bottom: 3em; }
        pre { background: #f7f7f7; padding: 1em; overflow-x: auto; }
        td { background-repeat: no-repeat; }
    "#
}
