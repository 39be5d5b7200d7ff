//! End-to-end tests: logical name -> loader -> parse -> transform.

use serde::Serialize;
use serde_json::json;
use std::io::Write;
use stylet::{ColonNameParser, DirLoader, EngineError, MapLoader, Response, XsltEngine};
use tempfile::TempDir;

const ECHO_STYLESHEET: &str = "<xsl:stylesheet version=\"1.0\" \
     xmlns:xsl=\"http://www.w3.org/1999/XSL/Transform\">\
     <xsl:template match=\"/\"><html><body>body text</body></html></xsl:template>\
     </xsl:stylesheet>";

const EXPECTED_ECHO: &str =
    "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<html><body>body text</body></html>";

fn map_engine(templates: &[(&str, &str)]) -> XsltEngine {
    let mut loader = MapLoader::new();
    for (name, content) in templates {
        loader.add(*name, *content);
    }
    XsltEngine::new(Box::new(ColonNameParser), Box::new(loader))
}

fn write_template(dir: &TempDir, relative: &str, content: &str) {
    let path = dir.path().join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut file = std::fs::File::create(path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
}

// =============================================================================
// render
// =============================================================================

#[test]
fn test_render_literal_echo_from_inline_storage() {
    let engine = map_engine(&[("App:Home:index.html.xsl", ECHO_STYLESHEET)]);
    let output = engine.render("App:Home:index.html.xsl", &json!({})).unwrap();
    assert_eq!(output.trim(), EXPECTED_ECHO);
}

#[test]
fn test_render_ignores_parameters_for_literal_stylesheet() {
    let engine = map_engine(&[("App:Home:index.html.xsl", ECHO_STYLESHEET)]);
    let empty = engine.render("App:Home:index.html.xsl", &json!({})).unwrap();
    let full = engine
        .render(
            "App:Home:index.html.xsl",
            &json!({"user": "Ada", "items": [1, 2, 3]}),
        )
        .unwrap();
    assert_eq!(empty, full);
}

#[test]
fn test_render_from_file_storage() {
    let dir = TempDir::new().unwrap();
    write_template(&dir, "App/Home/index.html.xsl", ECHO_STYLESHEET);

    let engine = XsltEngine::new(
        Box::new(ColonNameParser),
        Box::new(DirLoader::new(dir.path())),
    );
    let output = engine.render("App:Home:index.html.xsl", &json!({})).unwrap();
    assert_eq!(output.trim(), EXPECTED_ECHO);
}

#[test]
fn test_render_reads_serialized_parameters() {
    #[derive(Serialize)]
    struct Greeting {
        name: String,
    }

    // Struct parameters serialize with the struct name as root element.
    let stylesheet = "<xsl:stylesheet version=\"1.0\" \
         xmlns:xsl=\"http://www.w3.org/1999/XSL/Transform\">\
         <xsl:template match=\"/\"><p><xsl:value-of select=\"/Greeting/name\"/></p></xsl:template>\
         </xsl:stylesheet>";
    let engine = map_engine(&[("::hello.html.xsl", stylesheet)]);

    let output = engine
        .render("::hello.html.xsl", &Greeting { name: "Ada".into() })
        .unwrap();
    assert!(output.ends_with("<p>Ada</p>"), "got: {}", output);
}

#[test]
fn test_render_missing_template_is_not_found() {
    let engine = map_engine(&[]);
    let result = engine.render("::missing.html.xsl", &json!({}));
    assert!(matches!(
        result,
        Err(EngineError::TemplateNotFound { .. })
    ));
}

#[test]
fn test_render_invalid_stylesheet_is_invalid_template() {
    let engine = map_engine(&[("::broken.html.xsl", "<xsl:stylesheet><unclosed>")]);
    let result = engine.render("::broken.html.xsl", &json!({}));
    assert!(matches!(result, Err(EngineError::InvalidTemplate { .. })));
}

#[test]
fn test_render_after_failed_render_succeeds() {
    let engine = map_engine(&[
        ("::broken.html.xsl", "<unclosed>"),
        ("::ok.html.xsl", ECHO_STYLESHEET),
    ]);

    assert!(engine.render("::broken.html.xsl", &json!({})).is_err());
    let output = engine.render("::ok.html.xsl", &json!({})).unwrap();
    assert_eq!(output.trim(), EXPECTED_ECHO);
}

#[test]
fn test_render_rejects_doctype_stylesheet() {
    let with_doctype = format!("<!DOCTYPE stylesheet SYSTEM \"x.dtd\">{}", ECHO_STYLESHEET);
    let engine = map_engine(&[("::hardened.html.xsl", with_doctype.as_str())]);
    let result = engine.render("::hardened.html.xsl", &json!({}));
    assert!(matches!(result, Err(EngineError::InvalidTemplate { .. })));
}

// =============================================================================
// render_response
// =============================================================================

#[test]
fn test_render_response_creates_fresh_response() {
    let engine = map_engine(&[("::page.html.xsl", ECHO_STYLESHEET)]);
    let response = engine
        .render_response("::page.html.xsl", &json!({}), None)
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.body(),
        engine.render("::page.html.xsl", &json!({})).unwrap()
    );
}

#[test]
fn test_render_response_replaces_body_of_supplied_response() {
    let engine = map_engine(&[("::page.html.xsl", ECHO_STYLESHEET)]);

    let mut supplied = Response::new();
    supplied.set_status(201);
    supplied.set_body("previous body");

    let response = engine
        .render_response("::page.html.xsl", &json!({}), Some(supplied))
        .unwrap();

    // Status survives, body is replaced rather than appended.
    assert_eq!(response.status(), 201);
    assert!(!response.body().contains("previous body"));
    assert_eq!(response.body().trim(), EXPECTED_ECHO);
}

#[test]
fn test_render_response_propagates_render_failure() {
    let engine = map_engine(&[]);
    let result = engine.render_response("::missing.html.xsl", &json!({}), None);
    assert!(matches!(
        result,
        Err(EngineError::TemplateNotFound { .. })
    ));
}

// =============================================================================
// supports / exists against the full stack
// =============================================================================

#[test]
fn test_supports_is_engine_tag_only() {
    let engine = map_engine(&[]);
    // supports() consults the name only; the template need not exist.
    assert!(engine.supports("App:Home:index.html.xsl").unwrap());
    assert!(!engine.supports("App:Home:index.html.jinja").unwrap());
}

#[test]
fn test_exists_matrix() {
    let dir = TempDir::new().unwrap();
    write_template(&dir, "ok.html.xsl", ECHO_STYLESHEET);
    write_template(&dir, "broken.html.xsl", "<a><b></a>");

    let engine = XsltEngine::new(
        Box::new(ColonNameParser),
        Box::new(DirLoader::new(dir.path())),
    );

    assert!(engine.exists("::ok.html.xsl"));
    assert!(!engine.exists("::broken.html.xsl"));
    assert!(!engine.exists("::absent.html.xsl"));
    assert!(!engine.exists("not a name"));
}
