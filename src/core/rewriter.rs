//! Rewrites a fetched page so it renders from our origin with an accessibility
//! style sheet applied.
//!
//! The document is parsed with html5ever (through kuchiki), which never fails:
//! malformed markup is repaired the same way a browser would repair it, and the
//! parser synthesizes `<html>`, `<head>` and `<body>` when they are missing.

use crate::core::custom_css::css_for_params;
use crate::core::styles::{RewriteConfig, StyleMode};
use crate::domain::model::{CustomStyleParams, Profile, PROFILE_CLASS_PREFIX};
use html5ever::{namespace_url, ns, LocalName, QualName};
use kuchiki::traits::TendrilSink;
use kuchiki::{Attribute, ExpandedName, NodeRef};
use std::sync::Arc;
use url::Url;

/// `id` of the injected `<style>` element.
pub const STYLE_ELEMENT_ID: &str = "a11y-profile";

#[derive(Debug, Clone)]
pub struct AccessibilityRewriter {
    config: Arc<RewriteConfig>,
}

impl AccessibilityRewriter {
    pub fn new(config: RewriteConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Rewrites `html` fetched from `page_url` for `profile`.
    ///
    /// `custom` is only read for [`Profile::Custom`]; `None` means defaults.
    pub fn rewrite(
        &self,
        html: &str,
        page_url: &Url,
        profile: &Profile,
        custom: Option<&CustomStyleParams>,
    ) -> String {
        let document = kuchiki::parse_html().one(html);

        let root = ensure_html_root(&document);
        let head = ensure_head(&document, &root);

        match base_href(page_url) {
            Some(href) => replace_base(&document, &head, &href),
            None => tracing::debug!(url = %page_url, "URL has no origin, skipping <base>"),
        }

        if self.config.strips_scripts(profile) {
            let removed = remove_all(&document, "script");
            tracing::debug!(profile = %profile, removed, "Stripped script elements");
        }

        let css = self.resolve_css(profile, custom);
        inject_style(&document, &head, &css);

        if self.config.mode == StyleMode::SharedClass {
            let body = ensure_body(&document, &root);
            apply_profile_class(&body, profile);
        }

        document.to_string()
    }

    /// Style sheet text injected for `profile` under the configured mode.
    pub fn resolve_css(&self, profile: &Profile, custom: Option<&CustomStyleParams>) -> String {
        if profile.is_custom() {
            let defaults = CustomStyleParams::default();
            return css_for_params(&self.config.gradients, custom.unwrap_or(&defaults));
        }

        match self.config.mode {
            StyleMode::PerProfile => self.config.profiles.css_for(profile).to_string(),
            StyleMode::SharedClass => self.config.shared_css.clone(),
        }
    }
}

impl Default for AccessibilityRewriter {
    fn default() -> Self {
        Self::new(RewriteConfig::default())
    }
}

/// `scheme://host[:port]` of `url`, `None` for URLs with an opaque origin.
pub fn base_href(url: &Url) -> Option<String> {
    let origin = url.origin();
    if origin.is_tuple() {
        Some(origin.ascii_serialization())
    } else {
        None
    }
}

fn new_html_element(tag: &str, attributes: &[(&str, &str)]) -> NodeRef {
    let name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attributes.iter().map(|(name, value)| {
        (
            ExpandedName::new(ns!(), LocalName::from(*name)),
            Attribute {
                prefix: None,
                value: value.to_string(),
            },
        )
    });
    NodeRef::new_element(name, attributes)
}

fn is_element(node: &NodeRef, tag: &str) -> bool {
    node.as_element()
        .map(|element| &*element.name.local == tag)
        .unwrap_or(false)
}

fn select_all(node: &NodeRef, selector: &str) -> Vec<NodeRef> {
    node.select(selector)
        .map(|matches| matches.map(|m| m.as_node().clone()).collect::<Vec<_>>())
        .unwrap_or_default()
}

fn remove_all(document: &NodeRef, selector: &str) -> usize {
    let nodes = select_all(document, selector);
    for node in &nodes {
        node.detach();
    }
    nodes.len()
}

fn ensure_html_root(document: &NodeRef) -> NodeRef {
    if let Ok(html) = document.select_first("html") {
        return html.as_node().clone();
    }

    let html = new_html_element("html", &[]);
    let children: Vec<NodeRef> = document
        .children()
        .filter(|child| child.as_doctype().is_none())
        .collect();
    for child in children {
        child.detach();
        html.append(child);
    }
    document.append(html.clone());
    html
}

fn ensure_head(document: &NodeRef, root: &NodeRef) -> NodeRef {
    if let Ok(head) = document.select_first("head") {
        return head.as_node().clone();
    }

    let head = new_html_element("head", &[]);
    root.prepend(head.clone());
    head
}

fn ensure_body(document: &NodeRef, root: &NodeRef) -> NodeRef {
    if let Ok(body) = document.select_first("body") {
        return body.as_node().clone();
    }

    // frameset 文件沒有 <body>，把 head 以外的內容都搬進新的 body
    let body = new_html_element("body", &[]);
    let children: Vec<NodeRef> = root
        .children()
        .filter(|child| !is_element(child, "head"))
        .collect();
    for child in children {
        child.detach();
        body.append(child);
    }
    root.append(body.clone());
    body
}

fn replace_base(document: &NodeRef, head: &NodeRef, href: &str) {
    let removed = remove_all(document, "base");
    if removed > 0 {
        tracing::debug!(removed, "Replaced existing <base> element");
    }
    head.prepend(new_html_element("base", &[("href", href)]));
}

fn inject_style(document: &NodeRef, head: &NodeRef, css: &str) {
    remove_all(document, &format!("style#{}", STYLE_ELEMENT_ID));

    let style = new_html_element("style", &[("id", STYLE_ELEMENT_ID)]);
    style.append(NodeRef::new_text(css));
    head.append(style);
}

fn apply_profile_class(body: &NodeRef, profile: &Profile) {
    let Some(element) = body.as_element() else {
        return;
    };

    let mut attributes = element.attributes.borrow_mut();
    let mut classes: Vec<String> = attributes
        .get("class")
        .map(|value| {
            value
                .split_whitespace()
                .filter(|class| !class.starts_with(PROFILE_CLASS_PREFIX))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if let Some(class) = profile.class_name() {
        classes.push(class);
    }

    if classes.is_empty() {
        attributes.remove("class");
    } else {
        attributes.insert("class", classes.join(" "));
    }
}
