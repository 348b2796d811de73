//! Longform export: resolve the regions of a note and write LaTeX.
//!
//! [`parse_longform`] turns a root note into rendered abstract, body and
//! appendix strings plus the media files and citation keys they reference.
//! The writers then either fill a template or emit a standalone document.

use crate::cache::NoteCache;
use crate::classify::classify_sections;
use crate::node::{Header, Node};
use crate::notify::{ClipboardSink, Notifier};
use crate::parser::parse_note;
use crate::render::render_nodes;
use crate::store::DocumentStore;
use crate::types::{DocumentHandle, ParsedLongform, References};
use crate::unroll::{HeaderFrame, UnrollContext, Unrolled};
use crate::{Error, Result};
use regex::{NoExpand, Regex};
use std::path::PathBuf;
use tracing::{debug, info};

/// Knobs for one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// `\documentclass{}` of standalone output.
    pub document_class: String,
    /// File named by `\addbibresource{}`.
    pub bibliography: String,
    /// File named by the leading `\input{}`.
    pub header_input: String,
    /// Maximum nesting of embeds. `None` follows embeds without limit.
    pub max_embed_depth: Option<usize>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            document_class: "article".to_string(),
            bibliography: "bibliography.bib".to_string(),
            header_input: "header".to_string(),
            max_embed_depth: None,
        }
    }
}

/// What [`export_file`] should produce.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRequest {
    /// Template path relative to the store root.
    pub template: Option<PathBuf>,
    /// Preamble path relative to the store root; only its file name is used.
    pub preamble: Option<PathBuf>,
    /// Output path relative to the store root. Defaults to the note's path
    /// with a `.tex` extension.
    pub output: Option<PathBuf>,
    pub options: ExportOptions,
}

/// Resolve and render every region of a longform note.
///
/// With `selection`, that text is parsed in place of the root's contents; the
/// root still names the note for the cache.
pub async fn parse_longform<S>(
    store: &S,
    notifier: &dyn Notifier,
    root: &DocumentHandle,
    selection: Option<&str>,
    options: &ExportOptions,
) -> Result<ParsedLongform>
where
    S: DocumentStore + ?Sized,
{
    let text = match selection {
        Some(selection) => selection.to_string(),
        None => store.read(root).await?,
    };
    let note = parse_note(&text)?;
    let yaml = note.yaml.clone();

    let mut cache = NoteCache::new();
    cache.insert(root.basename.clone(), note.clone());

    let sections = classify_sections(note.body);
    let mut references = References::default();

    let abstract_text = match sections.abstract_header {
        Some(header) => {
            let resolved = resolve_header_region(store, notifier, &mut cache, header, options).await?;
            references.extend(resolved.references);
            Some(render_nodes(&resolved.nodes))
        },
        None => None,
    };

    let body_frame = sections.body_header.as_ref().map(HeaderFrame::from);
    let body = resolve_region(store, notifier, &mut cache, body_frame, sections.body, options).await?;
    references.extend(body.references);
    let body_text = render_nodes(&body.nodes);

    let appendix = match sections.appendix_header {
        Some(header) => {
            let resolved = resolve_header_region(store, notifier, &mut cache, header, options).await?;
            references.extend(resolved.references);
            Some(render_nodes(&resolved.nodes))
        },
        None => None,
    };

    debug!(
        "Parsed longform {}: {} notes cached, {} media files, {} citations",
        root.basename,
        cache.len(),
        references.media_files.len(),
        references.bib_keys.len()
    );

    Ok(ParsedLongform {
        yaml,
        abstract_text,
        body: body_text,
        appendix,
        media_files: references.media_files,
        bib_keys: references.bib_keys,
    })
}

async fn resolve_header_region<S>(
    store: &S,
    notifier: &dyn Notifier,
    cache: &mut NoteCache,
    mut header: Header,
    options: &ExportOptions,
) -> Result<Unrolled>
where
    S: DocumentStore + ?Sized,
{
    let children = std::mem::take(&mut header.children);
    let frame = HeaderFrame::from(&header);
    resolve_region(store, notifier, cache, Some(frame), children, options).await
}

/// One region gets its own header stack; the cache is shared.
async fn resolve_region<S>(
    store: &S,
    notifier: &dyn Notifier,
    cache: &mut NoteCache,
    frame: Option<HeaderFrame>,
    nodes: Vec<Node>,
    options: &ExportOptions,
) -> Result<Unrolled>
where
    S: DocumentStore + ?Sized,
{
    let mut ctx = UnrollContext::new(store, notifier, cache);
    if let Some(frame) = frame {
        ctx = ctx.with_header(frame);
    }
    if let Some(limit) = options.max_embed_depth {
        ctx = ctx.with_max_depth(limit);
    }
    ctx.unroll(nodes).await
}

/// Replace every `$key$` (any case) in `text` with `value`, taken literally.
fn substitute(text: &str, key: &str, value: &str) -> Result<String> {
    let pattern = Regex::new(&format!(r"(?i)\${}\$", regex::escape(key)))?;
    Ok(pattern.replace_all(text, NoExpand(value)).into_owned())
}

/// Fill a template: front-matter keys first, then `$body$`, then `$abstract$`
/// and `$appendix$` when those regions exist.
///
/// Every occurrence of a placeholder is replaced, not only the first, so a
/// template may repeat `$title$` in the title page and the running header.
pub fn fill_template(template: &str, parsed: &ParsedLongform) -> Result<String> {
    let mut content = template.to_string();
    for (key, value) in &parsed.yaml {
        content = substitute(&content, key, value)?;
    }
    content = substitute(&content, "body", &parsed.body)?;
    if let Some(abstract_text) = &parsed.abstract_text {
        content = substitute(&content, "abstract", abstract_text)?;
    }
    if let Some(appendix) = &parsed.appendix {
        content = substitute(&content, "appendix", appendix)?;
    }
    Ok(content)
}

/// Read `template`, fill it and write the result to `output`.
pub async fn write_with_template<S>(
    store: &S,
    template: &DocumentHandle,
    parsed: &ParsedLongform,
    output: &DocumentHandle,
) -> Result<()>
where
    S: DocumentStore + ?Sized,
{
    let template_text = store.read(template).await?;
    let content = fill_template(&template_text, parsed)?;
    store.modify(output, &content).await
}

fn push_abstract(content: &mut String, parsed: &ParsedLongform) {
    if let Some(abstract_text) = &parsed.abstract_text {
        content.push_str("\\begin{abstract}\n");
        content.push_str(abstract_text);
        content.push_str("\\end{abstract}\n");
    }
}

/// A complete document for notes exported without a template.
pub fn standalone_document(parsed: &ParsedLongform, preamble: Option<&str>, options: &ExportOptions) -> String {
    let mut content = format!(
        "\\documentclass{{{}}}\n\\input{{{}}}\n",
        options.document_class, options.header_input
    );
    if let Some(preamble) = preamble {
        content.push_str(&format!("\\input{{{preamble}}}\n"));
    }
    content.push_str(&format!("\\addbibresource{{{}}}\n", options.bibliography));
    content.push_str(&format!(
        "\\title{{{}}}\n",
        parsed.yaml.get("title").map_or("", String::as_str)
    ));
    if let Some(author) = parsed.yaml.get("author") {
        content.push_str(&format!("\\author{{{author}}}\n"));
    }
    content.push_str("\\begin{document}\n\\maketitle\n");
    push_abstract(&mut content, parsed);
    content.push_str(&parsed.body);
    content.push_str("\\printbibliography\n");
    if let Some(appendix) = &parsed.appendix {
        content.push_str("\\appendix\n\\section{Appendix}\n");
        content.push_str(appendix);
    }
    content.push_str("\\end{document}");
    content
}

/// Write a standalone document to `output`.
pub async fn write_without_template<S>(
    store: &S,
    parsed: &ParsedLongform,
    output: &DocumentHandle,
    preamble: Option<&DocumentHandle>,
    options: &ExportOptions,
) -> Result<()>
where
    S: DocumentStore + ?Sized,
{
    let content = standalone_document(parsed, preamble.map(|p| p.name.as_str()), options);
    store.modify(output, &content).await
}

/// Abstract, body and appendix joined for pasting into an existing document.
pub fn join_sections(parsed: &ParsedLongform) -> String {
    let mut content = String::new();
    push_abstract(&mut content, parsed);
    content.push_str(&parsed.body);
    if let Some(appendix) = &parsed.appendix {
        content.push_str("\\printbibliography\n");
        content.push_str("\\appendix\n\\section{Appendix}\n");
        content.push_str(appendix);
    }
    content
}

/// Export a selection of `root` to the clipboard and return the LaTeX.
pub async fn export_selection<S>(
    store: &S,
    notifier: &dyn Notifier,
    root: &DocumentHandle,
    selection: &str,
    clipboard: &dyn ClipboardSink,
    options: &ExportOptions,
) -> Result<String>
where
    S: DocumentStore + ?Sized,
{
    let parsed = parse_longform(store, notifier, root, Some(selection), options).await?;
    let content = join_sections(&parsed);
    clipboard.copy(&content)?;
    notifier.info("Latex content copied to clipboard");
    Ok(content)
}

/// Look up a note by address, export it and write the `.tex` file.
///
/// Returns the output handle and the parsed longform.
pub async fn export_file<S>(
    store: &S,
    notifier: &dyn Notifier,
    address: &str,
    request: &ExportRequest,
) -> Result<(DocumentHandle, ParsedLongform)>
where
    S: DocumentStore + ?Sized,
{
    let root = store
        .find(address)
        .ok_or_else(|| Error::NotFound(address.to_string()))?;

    let output = match &request.output {
        Some(path) => store.handle_for(path),
        None => store.handle_for(&root.path.with_extension("tex")),
    };

    let parsed = parse_longform(store, notifier, &root, None, &request.options).await?;

    match &request.template {
        Some(template) => {
            let template = store.handle_for(template);
            write_with_template(store, &template, &parsed, &output).await?;
        },
        None => {
            let preamble = request.preamble.as_deref().map(|path| store.handle_for(path));
            write_without_template(store, &parsed, &output, preamble.as_ref(), &request.options).await?;
        },
    }

    info!("Exported {} to {}", root.path.display(), output.path.display());
    Ok((output, parsed))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Frontmatter;

    fn longform(abstract_text: Option<&str>, appendix: Option<&str>) -> ParsedLongform {
        let mut yaml = Frontmatter::new();
        yaml.insert("title".to_string(), "On Things".to_string());
        yaml.insert("author".to_string(), "Ada".to_string());
        ParsedLongform {
            yaml,
            abstract_text: abstract_text.map(str::to_string),
            body: "BODY\n".to_string(),
            appendix: appendix.map(str::to_string),
            media_files: Vec::new(),
            bib_keys: Vec::new(),
        }
    }

    #[test]
    fn test_template_substitution_is_case_insensitive_and_global() {
        let parsed = longform(Some("ABS\n"), None);
        let out = fill_template(
            "\\title{$TITLE$} $Title$\n$abstract$$body$$appendix$",
            &parsed,
        )
        .unwrap();
        assert_eq!(out, "\\title{On Things} On Things\nABS\nBODY\n$appendix$");
    }

    #[test]
    fn test_template_values_are_literal() {
        let mut parsed = longform(None, None);
        parsed.body = "costs $1 and ${x}\n".to_string();
        let out = fill_template("$body$", &parsed).unwrap();
        assert_eq!(out, "costs $1 and ${x}\n");
    }

    #[test]
    fn test_template_keys_with_regex_characters() {
        let mut parsed = longform(None, None);
        parsed.yaml.insert("a.b".to_string(), "dotted".to_string());
        let out = fill_template("$a.b$ $axb$", &parsed).unwrap();
        assert_eq!(out, "dotted $axb$");
    }

    #[test]
    fn test_standalone_document_full() {
        let parsed = longform(Some("ABS\n"), Some("APP\n"));
        let out = standalone_document(&parsed, Some("preamble.sty"), &ExportOptions::default());
        assert_eq!(
            out,
            "\\documentclass{article}\n\\input{header}\n\\input{preamble.sty}\n\\addbibresource{bibliography.bib}\n\\title{On Things}\n\\author{Ada}\n\\begin{document}\n\\maketitle\n\\begin{abstract}\nABS\n\\end{abstract}\nBODY\n\\printbibliography\n\\appendix\n\\section{Appendix}\nAPP\n\\end{document}"
        );
    }

    #[test]
    fn test_standalone_document_minimal() {
        let mut parsed = longform(None, None);
        parsed.yaml.clear();
        let options = ExportOptions {
            document_class: "report".to_string(),
            bibliography: "refs.bib".to_string(),
            ..ExportOptions::default()
        };
        let out = standalone_document(&parsed, None, &options);
        assert_eq!(
            out,
            "\\documentclass{report}\n\\input{header}\n\\addbibresource{refs.bib}\n\\title{}\n\\begin{document}\n\\maketitle\nBODY\n\\printbibliography\n\\end{document}"
        );
    }

    #[test]
    fn test_join_sections() {
        assert_eq!(join_sections(&longform(None, None)), "BODY\n");
        assert_eq!(
            join_sections(&longform(Some("ABS\n"), Some("APP\n"))),
            "\\begin{abstract}\nABS\n\\end{abstract}\nBODY\n\\printbibliography\n\\appendix\n\\section{Appendix}\nAPP\n"
        );
    }
}
