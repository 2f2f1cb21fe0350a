//! HTML generation for printable documents

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, warn};

use crate::billing::Quote;
use crate::locale::Locale;
use crate::stylesheet::Stylesheet;
use crate::template::{Checklist, DocumentTemplate, ElementKind, RenderContext, TemplateElement};

use super::PrintConfig;

/// Neutral grey box printed when the agency has no logo
pub const PLACEHOLDER_LOGO: &str = "data:image/svg+xml,%3Csvg xmlns=%22http://www.w3.org/2000/svg%22 width=%22100%22 height=%2250%22%3E%3Crect fill=%22%23f0f0f0%22 width=%22100%22 height=%2250%22/%3E%3C/svg%3E";

const AUTO_PRINT_SCRIPT: &str = "window.onload = function () { window.focus(); window.print(); };";

/// Build an HTML document incrementally
pub struct HtmlBuilder {
    config: PrintConfig,
    locale: Locale,
    title: String,
    styles: Vec<String>,
    body: Vec<String>,
    scripts: Vec<String>,
    indent: usize,
}

impl HtmlBuilder {
    pub fn new(config: PrintConfig, locale: Locale, title: impl Into<String>) -> Self {
        Self {
            config,
            locale,
            title: title.into(),
            styles: vec![],
            body: vec![],
            scripts: vec![],
            indent: 1,
        }
    }

    /// Add CSS custom properties from a stylesheet
    pub fn add_stylesheet(&mut self, stylesheet: &Stylesheet) {
        let nl = self.newline();
        let mut css = format!(":root {{{}", nl);
        for (name, value) in stylesheet.css_variables() {
            css.push_str(&format!("{}{}: {};{}", self.pad(3), name, css_value(&value), nl));
        }
        css.push_str(&self.pad(2));
        css.push('}');
        self.styles.push(css);

        if let Some(font) = &stylesheet.font_family {
            self.styles.push(format!(
                ".{} {{ font-family: {}; }}",
                self.class("page"),
                css_value(font)
            ));
        }
    }

    /// Add the page box and element rules for a canvas of the given size
    pub fn add_page_styles(&mut self, width: f64, height: f64) {
        let scale = self.config.scale;
        let page = self.class("page");
        let element = self.class("element");
        let table = self.class("table");
        let amount = self.class("amount");
        let checklist = self.class("checklist");

        self.styles.extend([
            "@page { size: A4; margin: 0; }".to_string(),
            "* { box-sizing: border-box; }".to_string(),
            "body { margin: 0; }".to_string(),
            format!(
                ".{} {{ position: relative; width: {}; height: {}; overflow: hidden; }}",
                page,
                px(width * scale),
                px(height * scale)
            ),
            format!(".{} {{ position: absolute; overflow: hidden; }}", element),
            format!(".{} {{ width: 100%; border-collapse: collapse; }}", table),
            format!(
                ".{t} th, .{t} td {{ padding: 4px 6px; border-bottom: 1px solid var(--df-border-1); text-align: start; }}",
                t = table
            ),
            format!(".{t} .{a} {{ text-align: end; white-space: nowrap; }}", t = table, a = amount),
            format!(
                ".{} {{ display: grid; grid-template-columns: 1fr 1fr; gap: 2px 12px; }}",
                checklist
            ),
            format!(".{} {{ color: var(--df-status-success); }}", self.class("check-ok")),
            format!(".{} {{ color: var(--df-status-error); }}", self.class("check-ko")),
            format!(
                ".{} {{ display: flex; flex-direction: column; justify-content: space-between; align-items: center; }}",
                self.class("signature")
            ),
            format!(
                ".{} img, .{} img {{ max-width: 100%; max-height: 100%; object-fit: contain; }}",
                self.class("logo"),
                self.class("image")
            ),
        ]);
    }

    /// Register the script that opens the print dialog after load
    pub fn add_auto_print(&mut self) {
        self.scripts.push(AUTO_PRINT_SCRIPT.to_string());
    }

    /// Class name with the configured prefix
    pub fn class(&self, name: &str) -> String {
        format!("{}{}", self.prefix(), name)
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn pad(&self, level: usize) -> String {
        if self.config.pretty_print {
            "  ".repeat(level)
        } else {
            String::new()
        }
    }

    fn indent_str(&self) -> String {
        self.pad(self.indent)
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Open a page box; every page but the last forces a page break
    pub fn start_page(&mut self, index: usize, last: bool) {
        let break_style = if last {
            ""
        } else {
            r#" style="page-break-after: always;""#
        };
        self.body.push(format!(
            r#"{}<div class="{}" data-page="{}"{}>"#,
            self.indent_str(),
            self.class("page"),
            index + 1,
            break_style
        ));
        self.indent += 1;
    }

    pub fn end_page(&mut self) {
        self.end_element();
    }

    /// Open a positioned element box
    pub fn start_element(&mut self, id: &str, kinds: &[&str], style: &str) {
        let classes = std::iter::once(self.class("element"))
            .chain(kinds.iter().map(|k| self.class(k)))
            .collect::<Vec<_>>()
            .join(" ");
        let id_attr = if id.is_empty() {
            String::new()
        } else {
            format!(r#" id="{}""#, escape_xml(id))
        };
        self.body.push(format!(
            r#"{}<div{} class="{}" style="{}">"#,
            self.indent_str(),
            id_attr,
            classes,
            escape_xml(style)
        ));
        self.indent += 1;
    }

    /// Close the innermost open element
    pub fn end_element(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.body.push(format!("{}</div>", self.indent_str()));
    }

    /// Add a line of already escaped markup at the current depth
    pub fn add_line(&mut self, html: impl AsRef<str>) {
        self.body.push(format!("{}{}", self.indent_str(), html.as_ref()));
    }

    /// Build the final HTML string
    pub fn build(self) -> String {
        let nl = self.newline();
        let pad1 = self.pad(1);
        let pad2 = self.pad(2);

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>");
        html.push_str(nl);
        html.push_str(&format!(
            r#"<html lang="{}" dir="{}">"#,
            self.locale.tag(),
            self.locale.direction()
        ));
        html.push_str(nl);
        html.push_str("<head>");
        html.push_str(nl);
        html.push_str(&format!(r#"{}<meta charset="UTF-8"/>"#, pad1));
        html.push_str(nl);
        html.push_str(&format!("{}<title>{}</title>", pad1, escape_xml(&self.title)));
        html.push_str(nl);

        if !self.styles.is_empty() {
            html.push_str(&pad1);
            html.push_str("<style>");
            html.push_str(nl);
            for style in &self.styles {
                html.push_str(&pad2);
                html.push_str(style);
                html.push_str(nl);
            }
            html.push_str(&pad1);
            html.push_str("</style>");
            html.push_str(nl);
        }

        html.push_str("</head>");
        html.push_str(nl);
        html.push_str("<body>");
        html.push_str(nl);

        for line in &self.body {
            html.push_str(line);
            html.push_str(nl);
        }

        for script in &self.scripts {
            html.push_str(&format!("{}<script>{}</script>", pad1, script));
            html.push_str(nl);
        }

        html.push_str("</body>");
        html.push_str(nl);
        html.push_str("</html>");

        html
    }
}

/// Render a template to a standalone HTML document
pub fn render_html(
    template: &DocumentTemplate,
    ctx: &RenderContext<'_>,
    config: &PrintConfig,
    stylesheet: &Stylesheet,
) -> String {
    let mut builder = HtmlBuilder::new(config.clone(), ctx.locale(), template.display_name());
    builder.add_stylesheet(stylesheet);
    builder.add_page_styles(template.canvas_width, template.canvas_height);

    let pages = paginate(template);
    debug!(
        template = %template.id,
        elements = template.elements.len(),
        pages = pages.len(),
        "paginated template"
    );

    let mut renderer = ElementRenderer {
        ctx,
        config,
        stylesheet,
        signature_embedded: false,
    };
    for (printed, (index, elements)) in pages.iter().enumerate() {
        builder.start_page(printed, printed + 1 == pages.len());
        let page_top = *index as f64 * template.canvas_height;
        for element in elements {
            renderer.render(element, page_top, &mut builder);
        }
        builder.end_page();
    }

    if config.auto_print {
        builder.add_auto_print();
    }

    builder.build()
}

/// Pages to print with their canvas page index; an empty template still
/// prints one blank page
fn paginate(template: &DocumentTemplate) -> Vec<(usize, Vec<&TemplateElement>)> {
    for element in template.elements.iter().filter(|e| template.page_of(e).is_none()) {
        warn!(element = %element.id, y = element.y, "element below the last printable page is not printed");
    }
    let mut pages: Vec<_> = template.pages().into_iter().collect();
    if pages.is_empty() {
        pages.push((0, Vec::new()));
    }
    pages
}

struct ElementRenderer<'r, 'a> {
    ctx: &'r RenderContext<'a>,
    config: &'r PrintConfig,
    stylesheet: &'r Stylesheet,
    /// The inspection signature goes into the first signature box only
    signature_embedded: bool,
}

impl ElementRenderer<'_, '_> {
    fn render(
        &mut self,
        element: &TemplateElement,
        page_top: f64,
        builder: &mut HtmlBuilder,
    ) {
        let style = self.box_style(element, page_top);
        match element.kind {
            ElementKind::Text => {
                let text = self.text(&element.content);
                builder.start_element(&element.id, &["text"], &style);
                builder.add_line(text);
                builder.end_element();
            }
            ElementKind::Table => self.render_table(element, &style, builder),
            ElementKind::Checklist => self.render_checklist(element, &style, builder),
            ElementKind::Signature => self.render_signature(element, &style, builder),
            ElementKind::Logo => {
                let src = logo_source(self.ctx.store.logo.as_deref(), self.config.asset_dir.as_deref());
                builder.start_element(&element.id, &["logo"], &style);
                builder.add_line(format!(
                    r#"<img src="{}" alt="{}"/>"#,
                    escape_xml(&src),
                    escape_xml(self.ctx.store.display_name())
                ));
                builder.end_element();
            }
            ElementKind::Image => {
                builder.start_element(&element.id, &["image"], &style);
                let src = element.content.trim();
                if !src.is_empty() {
                    builder.add_line(format!(r#"<img src="{}" alt=""/>"#, escape_xml(src)));
                }
                builder.end_element();
            }
            ElementKind::Divider => {
                let fill = if is_transparent(&element.background_color) {
                    &element.color
                } else {
                    &element.background_color
                };
                let style = format!("{} background-color: {};", style, self.color(fill));
                builder.start_element(&element.id, &["divider"], &style);
                builder.end_element();
            }
        }
    }

    fn render_table(
        &self,
        element: &TemplateElement,
        style: &str,
        builder: &mut HtmlBuilder,
    ) {
        let ctx = self.ctx;
        let quote = Quote::for_reservation(ctx.reservation, ctx.vehicle, ctx.settings.tva_rate);
        let lines = quote.lines(&ctx.vehicle.display_name(), &ctx.reservation.options);
        let amount_class = builder.class("amount");

        builder.start_element(&element.id, &["table-block"], style);
        if !element.content.trim().is_empty() {
            let caption = self.text(&element.content);
            builder.add_line(format!(r#"<div class="{}">{}</div>"#, builder.class("table-caption"), caption));
        }
        builder.add_line(format!(r#"<table class="{}">"#, builder.class("table")));
        builder.add_line(format!(
            r#"<thead><tr><th>Désignation</th><th>Qté</th><th class="{}">Montant</th></tr></thead>"#,
            amount_class
        ));
        builder.add_line("<tbody>");
        for line in &lines {
            let qty = line.quantity.map(|q| q.to_string()).unwrap_or_default();
            builder.add_line(format!(
                r#"<tr><td>{}</td><td>{}</td><td class="{}">{}</td></tr>"#,
                escape_xml(&line.label),
                qty,
                amount_class,
                escape_xml(&self.money(line.amount))
            ));
        }
        builder.add_line("</tbody>");
        builder.add_line(format!(
            r#"<tfoot><tr><th colspan="2">Total</th><th class="{}">{}</th></tr></tfoot>"#,
            amount_class,
            escape_xml(&self.money(quote.final_total))
        ));
        builder.add_line("</table>");
        builder.end_element();
    }

    fn render_checklist(
        &self,
        element: &TemplateElement,
        style: &str,
        builder: &mut HtmlBuilder,
    ) {
        let checklist = match Checklist::parse(&element.content) {
            Ok(list) => list,
            Err(e) => {
                warn!(element = %element.id, error = %e, "checklist printed as plain text");
                let text = self.text(&element.content);
                builder.start_element(&element.id, &["text"], style);
                builder.add_line(text);
                builder.end_element();
                return;
            }
        };

        builder.start_element(&element.id, &["checklist"], style);
        for item in &checklist.items {
            let mark_class = if item.checked { "check-ok" } else { "check-ko" };
            let label = self.text(&item.label);
            builder.add_line(format!(
                r#"<div class="{}"><span class="{}">{}</span> {}</div>"#,
                builder.class("check-item"),
                builder.class(mark_class),
                item.mark(),
                label
            ));
        }
        builder.end_element();
    }

    fn render_signature(
        &mut self,
        element: &TemplateElement,
        style: &str,
        builder: &mut HtmlBuilder,
    ) {
        let caption = self.text(&element.content);
        builder.start_element(&element.id, &["signature"], style);
        if !self.signature_embedded {
            let signature = self
                .ctx
                .inspection
                .and_then(|i| i.signature.as_deref())
                .filter(|s| s.starts_with("data:image/"));
            if let Some(src) = signature {
                builder.add_line(format!(r#"<img src="{}" alt="signature"/>"#, escape_xml(src)));
                self.signature_embedded = true;
            }
        }
        builder.add_line(format!(r#"<span>{}</span>"#, caption));
        builder.end_element();
    }

    /// Substituted, escaped text with line breaks kept
    fn text(&self, content: &str) -> String {
        escape_xml(&self.ctx.substitute(content)).replace('\n', "<br/>")
    }

    fn money(&self, amount: f64) -> String {
        format!(
            "{} {}",
            self.ctx.locale().format_amount(amount),
            self.ctx.settings.currency
        )
    }

    fn color(&self, value: &str) -> String {
        css_value(&self.stylesheet.resolve_color(value))
    }

    /// Inline position and typography of an element relative to its page
    fn box_style(&self, element: &TemplateElement, page_top: f64) -> String {
        let scale = self.config.scale;
        let family = self
            .stylesheet
            .font_family
            .as_deref()
            .unwrap_or(&element.font_family);

        let mut parts = vec![
            format!("left: {};", px(element.x * scale)),
            format!("top: {};", px((element.y - page_top) * scale)),
            format!("width: {};", px(element.width * scale)),
            format!("height: {};", px(element.height * scale)),
            format!("font-size: {};", px(element.font_size * scale)),
            format!("font-family: {};", css_value(family)),
            format!("font-weight: {};", css_value(&element.font_weight)),
            format!("color: {};", self.color(&element.color)),
            format!("text-align: {};", element.text_align.as_css()),
        ];
        if !is_transparent(&element.background_color) {
            parts.push(format!("background-color: {};", self.color(&element.background_color)));
        }
        if element.border_width > 0.0 {
            parts.push(format!(
                "border: {} solid {};",
                px(element.border_width * scale),
                self.color(&element.border_color)
            ));
        }
        if element.opacity < 1.0 {
            parts.push(format!("opacity: {};", element.opacity.max(0.0)));
        }
        parts.join(" ")
    }
}

/// Image source for the agency logo
///
/// URLs and data URIs are used as given. Anything else is a file path,
/// read and embedded as a base64 data URI.
pub fn logo_source(logo: Option<&str>, asset_dir: Option<&Path>) -> String {
    let Some(logo) = logo.map(str::trim).filter(|l| !l.is_empty()) else {
        return PLACEHOLDER_LOGO.to_string();
    };
    if logo.starts_with("data:") || logo.starts_with("http://") || logo.starts_with("https://") {
        return logo.to_string();
    }

    let raw = PathBuf::from(logo.strip_prefix("file://").unwrap_or(logo));
    let path = match asset_dir {
        Some(dir) if raw.is_relative() => dir.join(raw),
        _ => raw,
    };
    match std::fs::read(&path) {
        Ok(bytes) => format!("data:{};base64,{}", image_mime(&path), STANDARD.encode(bytes)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read logo, using placeholder");
            PLACEHOLDER_LOGO.to_string()
        }
    }
}

fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => "image/png",
    }
}

fn is_transparent(color: &str) -> bool {
    let c = color.trim();
    c.is_empty() || c.eq_ignore_ascii_case("transparent")
}

fn px(value: f64) -> String {
    format!("{}px", (value * 100.0).round() / 100.0)
}

/// Strip characters that could close a declaration or the style block
fn css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>'))
        .collect()
}

/// Escape special XML characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
