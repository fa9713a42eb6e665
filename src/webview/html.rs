//! Renders the static document a page is loaded from.

use super::page::Page;
use crate::ports::IdGenerator;
use crate::protocol::WebviewConfig;

/// Renders the document for `page`.
///
/// Assets are resolved below `resource_uri`. The content security policy
/// only admits scripts carrying a fresh nonce from `id_gen` or loaded
/// from `resource_uri`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized.
pub fn render(
    page: &Page,
    config: &WebviewConfig,
    resource_uri: &str,
    id_gen: &dyn IdGenerator,
) -> Result<String, serde_json::Error> {
    let nonce = id_gen.generate_id();
    let base = resource_uri.trim_end_matches('/');
    let asset = |kind: &str, stem: &str, ext: &str| escape(&format!("{base}/{kind}/{stem}.{ext}"));
    let config_json = serde_json::to_string(config)?.replace("</", "<\\/");
    let source = escape(base);
    let l10n = escape(&config.l10n_uri);

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="{lang}" theme="{theme}">
  <head>
    <meta charset="UTF-8" />
    <meta http-equiv="Content-Security-Policy" content="default-src 'none'; style-src {source}; font-src {source}; img-src {source} data:; connect-src {l10n}; script-src 'nonce-{nonce}' {source};" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>{title}</title>
    <link rel="stylesheet" href="{main_css}" />
    <link rel="stylesheet" href="{page_css}" />
    <script type="module" nonce="{nonce}">
      import run from "{main_js}"
      import Page from "{page_js}"
      await run((options) => new Page({{ target: document.body, ...options }}), {config_json})
    </script>
  </head>
  <body>
  </body>
</html>
"#,
        lang = escape(&config.language),
        theme = escape(&config.theme),
        title = escape(&page.title),
        main_css = asset("css", "main", "css"),
        page_css = asset("css", &page.path, "css"),
        main_js = asset("js", "main", "js"),
        page_js = asset("js", &page.path, "js"),
    ))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
