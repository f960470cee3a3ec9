//! Prompt templates for translation and repair requests

use crate::error::Result;
use crate::script::ScriptType;
use once_cell::sync::Lazy;
use tera::{Context, Tera};

const TRANSLATE_TEMPLATE: &str = "translate.txt";
const REPAIR_TEMPLATE: &str = "repair.txt";

const TRANSLATE_BODY: &str = r#"You are an expert Go programmer. Convert the following {{ script_type }} script to idiomatic Go code.

Requirements:
1. Use proper error handling with wrapped errors
2. Follow Go naming conventions (camelCase for unexported, PascalCase for exported)
3. Add necessary imports
4. Include a main function that can be compiled into a standalone binary
5. Add brief comments explaining the logic
6. Use the standard library when possible
7. Return ONLY the Go code without any explanation or markdown formatting

{{ script_type }} script to convert:
```
{{ code }}
```"#;

const REPAIR_BODY: &str = r#"The following Go code has a compilation error. Please fix it and return only the corrected Go code without any explanation or markdown formatting.

Error message:
{{ error_message }}

Go code to fix:
```go
{{ code }}
```"#;

static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]); // Disable autoescaping for code
    tera.add_raw_templates(vec![
        (TRANSLATE_TEMPLATE, TRANSLATE_BODY),
        (REPAIR_TEMPLATE, REPAIR_BODY),
    ])
    .expect("Invalid prompt template");
    tera
});

/// Render the request asking for a Go translation of `code`
pub fn build_translation_prompt(script_type: ScriptType, code: &str) -> Result<String> {
    let mut context = Context::new();
    context.insert("script_type", script_type.as_str());
    context.insert("code", code);
    Ok(TEMPLATES.render(TRANSLATE_TEMPLATE, &context)?)
}

/// Render the request asking to fix `go_code` given the compiler's complaint
pub fn build_repair_prompt(go_code: &str, error_message: &str) -> Result<String> {
    let mut context = Context::new();
    context.insert("code", go_code);
    context.insert("error_message", error_message);
    Ok(TEMPLATES.render(REPAIR_TEMPLATE, &context)?)
}
