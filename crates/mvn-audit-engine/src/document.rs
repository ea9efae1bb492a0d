//! Reference host: an in-memory pom.xml document model.
//!
//! Parses descriptor text with a quick-xml SAX reader, tracking byte spans
//! so edit plans can point back into the source. Implements the three
//! host-side contracts the engine audits through: [`DocumentModel`],
//! [`ReferenceResolver`], and [`EditApplier`].
//!
//! Spans are valid for the content they were parsed from; after an edit is
//! applied the document should be re-parsed before further audits.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::Event;

use mvn_audit_core::{
    AuditError, DependencyDeclaration, DocumentModel, EditApplier, PlaceholderBinding,
    ReferenceResolver, Result,
};

/// Byte range into the document content; the opaque location handle for
/// this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
struct PropertyDefinition {
    value: String,
    span: Option<Span>,
}

pub struct PomDocument {
    content: String,
    display_name: Option<String>,
    artifact_id: Option<String>,
    project_version: Option<PropertyDefinition>,
    dependencies: Vec<DependencyDeclaration<Span>>,
    managed: Vec<DependencyDeclaration<Span>>,
    properties: HashMap<String, PropertyDefinition>,
}

/// Context stack element for SAX parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseContext {
    Root,
    Dependencies,
    DependencyManagement,
    ManagedDependencies,
    Dependency { managed: bool },
    Properties,
    /// Subtree we take no interest in; every nested start pushes another.
    Ignored,
}

/// Accumulator for a single dependency being parsed.
#[derive(Default)]
struct DepAccum {
    decl_start: u64,
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    version_span: Option<Span>,
}

impl PomDocument {
    pub fn parse(content: &str) -> Result<Self> {
        let mut doc = Self {
            content: content.to_string(),
            display_name: None,
            artifact_id: None,
            project_version: None,
            dependencies: Vec::new(),
            managed: Vec::new(),
            properties: HashMap::new(),
        };

        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut context_stack: Vec<ParseContext> = vec![ParseContext::Root];
        let mut current_dep: Option<DepAccum> = None;
        let mut current_tag: Option<String> = None;

        loop {
            let pos = reader.buffer_position();
            let event = reader.read_event().map_err(|e| AuditError::ParseError {
                message: e.to_string(),
            })?;

            match event {
                Event::Start(ref e) => {
                    let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    let ctx = context_stack.last().cloned().unwrap_or(ParseContext::Root);

                    match (ctx, tag.as_str()) {
                        (ParseContext::Root, "project") => {}
                        (ParseContext::Root, "dependencies") => {
                            context_stack.push(ParseContext::Dependencies);
                        }
                        (ParseContext::Root, "dependencyManagement") => {
                            context_stack.push(ParseContext::DependencyManagement);
                        }
                        (ParseContext::DependencyManagement, "dependencies") => {
                            context_stack.push(ParseContext::ManagedDependencies);
                        }
                        (ParseContext::Root, "properties") => {
                            context_stack.push(ParseContext::Properties);
                        }
                        (ParseContext::Root, "artifactId" | "name" | "version") => {
                            current_tag = Some(tag);
                        }
                        (ParseContext::Dependencies, "dependency") => {
                            context_stack.push(ParseContext::Dependency { managed: false });
                            current_dep = Some(DepAccum {
                                decl_start: pos,
                                ..DepAccum::default()
                            });
                            current_tag = None;
                        }
                        (ParseContext::ManagedDependencies, "dependency") => {
                            context_stack.push(ParseContext::Dependency { managed: true });
                            current_dep = Some(DepAccum {
                                decl_start: pos,
                                ..DepAccum::default()
                            });
                            current_tag = None;
                        }
                        // Exclusions carry coordinates of their own that
                        // must not clobber the dependency's.
                        (ParseContext::Dependency { .. }, "exclusions") => {
                            context_stack.push(ParseContext::Ignored);
                        }
                        (ParseContext::Dependency { .. } | ParseContext::Properties, field) => {
                            current_tag = Some(field.to_string());
                        }
                        _ => {
                            context_stack.push(ParseContext::Ignored);
                        }
                    }
                }
                Event::Text(ref e) => {
                    let text = match e.decode() {
                        Ok(cow) => {
                            let s = cow.trim().to_string();
                            quick_xml::escape::unescape(&s)
                                .map(|c| c.into_owned())
                                .unwrap_or(s)
                        }
                        Err(_) => String::from_utf8_lossy(e.as_ref()).trim().to_string(),
                    };
                    let span = text_span(content, pos as usize, &text);

                    let ctx = context_stack.last().cloned().unwrap_or(ParseContext::Root);
                    match (ctx, current_tag.as_deref()) {
                        (ParseContext::Dependency { .. }, Some(tag)) => {
                            if let Some(dep) = current_dep.as_mut() {
                                match tag {
                                    "groupId" => dep.group_id = Some(text),
                                    "artifactId" => dep.artifact_id = Some(text),
                                    "version" => {
                                        dep.version = Some(text);
                                        dep.version_span = span;
                                    }
                                    _ => {}
                                }
                            }
                        }
                        (ParseContext::Properties, Some(key)) => {
                            doc.properties
                                .insert(key.to_string(), PropertyDefinition { value: text, span });
                        }
                        (ParseContext::Root, Some("artifactId")) => {
                            doc.artifact_id = Some(text);
                        }
                        (ParseContext::Root, Some("name")) => {
                            doc.display_name = Some(text);
                        }
                        (ParseContext::Root, Some("version")) => {
                            doc.project_version = Some(PropertyDefinition { value: text, span });
                        }
                        _ => {}
                    }
                }
                Event::End(ref e) => {
                    let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    let ctx = context_stack.last().cloned().unwrap_or(ParseContext::Root);

                    match (ctx, tag.as_str()) {
                        (ParseContext::Dependency { managed }, "dependency") => {
                            context_stack.pop();
                            if let Some(accum) = current_dep.take() {
                                let end = reader.buffer_position();
                                if let Some(decl) = finalize_dep(accum, end) {
                                    if managed {
                                        doc.managed.push(decl);
                                    } else {
                                        doc.dependencies.push(decl);
                                    }
                                }
                            }
                            current_tag = None;
                        }
                        (ParseContext::Dependencies, "dependencies")
                        | (ParseContext::ManagedDependencies, "dependencies")
                        | (ParseContext::DependencyManagement, "dependencyManagement")
                        | (ParseContext::Properties, "properties")
                        | (ParseContext::Ignored, _) => {
                            context_stack.pop();
                        }
                        (ParseContext::Dependency { .. } | ParseContext::Properties, _)
                        | (ParseContext::Root, "artifactId" | "name" | "version") => {
                            current_tag = None;
                        }
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(doc)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.value.as_str()))
    }
}

fn finalize_dep(accum: DepAccum, decl_end: u64) -> Option<DependencyDeclaration<Span>> {
    let group_id = accum.group_id?;
    let artifact_id = accum.artifact_id?;
    Some(DependencyDeclaration {
        group_id,
        artifact_id,
        raw_version: accum.version,
        declaration_location: Span {
            start: accum.decl_start as usize,
            end: decl_end as usize,
        },
        version_location: accum.version_span,
    })
}

/// Locates the trimmed text near the reader's byte hint.
///
/// Uses the first occurrence at or after the hint; for documents repeating
/// the same token in close proximity the span may land on the earlier one,
/// which is acceptable for version tokens inside a single element.
fn text_span(content: &str, hint_start: usize, text: &str) -> Option<Span> {
    if text.is_empty() {
        return None;
    }
    let search_from = hint_start.min(content.len());
    content[search_from..].find(text).map(|rel| {
        let start = search_from + rel;
        Span {
            start,
            end: start + text.len(),
        }
    })
}

impl DocumentModel for PomDocument {
    type Handle = Span;

    fn declarations(&self) -> Vec<DependencyDeclaration<Span>> {
        self.dependencies.clone()
    }

    fn managed_declarations(&self) -> Vec<DependencyDeclaration<Span>> {
        self.managed.clone()
    }

    fn project_name(&self) -> Option<&str> {
        self.display_name.as_deref().or(self.artifact_id.as_deref())
    }
}

impl ReferenceResolver for PomDocument {
    type Handle = Span;

    fn resolve_placeholder(&self, name: &str) -> Option<PlaceholderBinding<Span>> {
        // Maven injects the project's own version under these names.
        let definition = match name {
            "project.version" | "pom.version" => self.project_version.as_ref()?,
            _ => self.properties.get(name)?,
        };
        Some(PlaceholderBinding {
            name: name.to_string(),
            definition_location: definition.span,
            value: definition.value.clone(),
        })
    }
}

impl EditApplier for PomDocument {
    type Handle = Span;

    fn set_text(&mut self, location: &Span, value: &str) -> Result<()> {
        if location.start > location.end || self.content.get(location.start..location.end).is_none()
        {
            return Err(AuditError::InvalidEditTarget {
                message: format!(
                    "byte range {}..{} is outside the document",
                    location.start, location.end
                ),
            });
        }
        self.content.replace_range(location.start..location.end, value);
        Ok(())
    }
}
