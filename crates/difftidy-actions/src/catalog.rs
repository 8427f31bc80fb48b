//! The shipped action catalog
//!
//! Every built-in action is a [`CommandAction`]: suffix matching with
//! optional exclusions and an optional compile-classification gate. The
//! default registry is [`standard_actions`]; the extra constructors exist
//! for hosts that want to opt in to more.

use std::sync::Arc;

use difftidy_host::{BuildClassification, EditCommand};

use crate::action::{DocumentDescriptor, FormatAction};

/// Suffix-matched format action with optional build gating.
///
/// Matching is case-insensitive on the file name. An excluded suffix beats
/// an included one, so `.designer.cs` stays untouched even though it ends
/// in `.cs`.
pub struct CommandAction {
    name: String,
    suffixes: Vec<String>,
    excluded_suffixes: Vec<String>,
    requires_compile: bool,
    command: EditCommand,
}

impl CommandAction {
    pub fn new(name: impl Into<String>, command: EditCommand) -> Self {
        Self {
            name: name.into(),
            suffixes: Vec::new(),
            excluded_suffixes: Vec::new(),
            requires_compile: false,
            command,
        }
    }

    /// Match files whose name ends with `suffix`.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffixes.push(suffix.into().to_lowercase());
        self
    }

    /// Never match files whose name ends with `suffix`.
    pub fn with_excluded_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.excluded_suffixes.push(suffix.into().to_lowercase());
        self
    }

    /// Only match documents the build system compiles.
    ///
    /// A document with no classification, including one whose metadata
    /// lookup failed, does not match.
    pub fn requiring_compile(mut self) -> Self {
        self.requires_compile = true;
        self
    }
}

impl FormatAction for CommandAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn applies_to(&self, document: &DocumentDescriptor) -> bool {
        let file_name = document.file_name().to_lowercase();
        if !self.suffixes.iter().any(|s| file_name.ends_with(s)) {
            return false;
        }
        if self
            .excluded_suffixes
            .iter()
            .any(|s| file_name.ends_with(s))
        {
            return false;
        }
        if self.requires_compile && document.build() != Some(BuildClassification::Compile) {
            return false;
        }
        true
    }

    fn command(&self) -> &EditCommand {
        &self.command
    }
}

/// Reformat compiled C# sources, leaving generated designer files alone.
pub fn csharp_format() -> CommandAction {
    CommandAction::new("csharp-format", EditCommand::format_document())
        .with_suffix(".cs")
        .with_excluded_suffix(".designer.cs")
        .requiring_compile()
}

/// Reformat TypeScript sources, skipping declaration files.
pub fn typescript_format() -> CommandAction {
    CommandAction::new("typescript-format", EditCommand::format_document())
        .with_suffix(".ts")
        .with_excluded_suffix(".d.ts")
}

/// Reformat HTML documents.
pub fn html_format() -> CommandAction {
    CommandAction::new("html-format", EditCommand::format_document())
        .with_suffix(".htm")
        .with_suffix(".html")
}

/// Reformat the XML family, including build and packaging files.
pub fn xml_format() -> CommandAction {
    CommandAction::new("xml-format", EditCommand::format_document())
        .with_suffix(".xml")
        .with_suffix(".xsd")
        .with_suffix(".xslt")
        .with_suffix(".props")
        .with_suffix(".targets")
        .with_suffix(".resx")
        .with_suffix(".config")
        .with_suffix(".nuspec")
}

/// Reformat JSON documents. Not part of [`standard_actions`].
pub fn json_format() -> CommandAction {
    CommandAction::new("json-format", EditCommand::format_document()).with_suffix(".json")
}

/// Reformat SCSS stylesheets. Not part of [`standard_actions`].
pub fn scss_format() -> CommandAction {
    CommandAction::new("scss-format", EditCommand::format_document()).with_suffix(".scss")
}

/// Sort and prune using directives in compiled C# sources.
///
/// Not part of [`standard_actions`]; hosts whose surface implements the
/// sort-imports command can register it alongside [`csharp_format`].
pub fn csharp_sort_usings() -> CommandAction {
    CommandAction::new("csharp-sort-usings", EditCommand::sort_imports())
        .with_suffix(".cs")
        .with_excluded_suffix(".designer.cs")
        .requiring_compile()
}

/// The default action registry, in execution order.
pub fn standard_actions() -> Vec<Arc<dyn FormatAction>> {
    vec![
        Arc::new(csharp_format()),
        Arc::new(typescript_format()),
        Arc::new(html_format()),
        Arc::new(xml_format()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled(path: &str) -> DocumentDescriptor {
        DocumentDescriptor::new(path, Some(BuildClassification::Compile))
    }

    fn unclassified(path: &str) -> DocumentDescriptor {
        DocumentDescriptor::new(path, None)
    }

    #[test]
    fn test_csharp_matches_compiled_sources() {
        let action = csharp_format();
        assert!(action.applies_to(&compiled("/ws/Program.cs")));
        assert!(action.applies_to(&compiled("/ws/PROGRAM.CS")));
    }

    #[test]
    fn test_csharp_skips_designer_files() {
        let action = csharp_format();
        assert!(!action.applies_to(&compiled("/ws/Form1.Designer.cs")));
        assert!(!action.applies_to(&compiled("/ws/form1.designer.CS")));
    }

    #[test]
    fn test_csharp_requires_compile_classification() {
        let action = csharp_format();
        assert!(!action.applies_to(&unclassified("/ws/Program.cs")));
        assert!(!action.applies_to(&DocumentDescriptor::new(
            "/ws/Program.cs",
            Some(BuildClassification::Content),
        )));
    }

    #[test]
    fn test_typescript_skips_declaration_files() {
        let action = typescript_format();
        assert!(action.applies_to(&unclassified("/ws/app.ts")));
        assert!(!action.applies_to(&unclassified("/ws/app.d.ts")));
        assert!(!action.applies_to(&unclassified("/ws/app.D.TS")));
    }

    #[test]
    fn test_html_matches_both_suffixes() {
        let action = html_format();
        assert!(action.applies_to(&unclassified("/ws/index.html")));
        assert!(action.applies_to(&unclassified("/ws/legacy.htm")));
        assert!(!action.applies_to(&unclassified("/ws/readme.md")));
    }

    #[test]
    fn test_xml_family_matches_exactly_one_action() {
        let actions = standard_actions();
        for file in [
            "/ws/app.xml",
            "/ws/schema.xsd",
            "/ws/transform.xslt",
            "/ws/dirs.props",
            "/ws/build.targets",
            "/ws/strings.resx",
            "/ws/web.config",
            "/ws/pkg.nuspec",
        ] {
            let descriptor = unclassified(file);
            let matching: Vec<&str> = actions
                .iter()
                .filter(|a| a.applies_to(&descriptor))
                .map(|a| a.name())
                .collect();
            assert_eq!(matching, vec!["xml-format"], "for {file}");
        }
    }

    #[test]
    fn test_optional_actions_stay_out_of_the_default_registry() {
        let actions = standard_actions();
        let names: Vec<&str> = actions.iter().map(|a| a.name()).collect();
        assert!(!names.contains(&"json-format"));
        assert!(!names.contains(&"scss-format"));
        assert!(!names.contains(&"csharp-sort-usings"));
    }

    #[test]
    fn test_sort_usings_shares_csharp_matching_rules() {
        let action = csharp_sort_usings();
        assert!(action.applies_to(&compiled("/ws/Program.cs")));
        assert!(!action.applies_to(&compiled("/ws/Form1.Designer.cs")));
        assert!(!action.applies_to(&unclassified("/ws/Program.cs")));
        assert_eq!(action.command().name(), "sort-imports");
    }

    #[test]
    fn test_registration_order_is_stable() {
        let actions = standard_actions();
        let names: Vec<&str> = actions.iter().map(|a| a.name()).collect();
        assert_eq!(
            names,
            vec![
                "csharp-format",
                "typescript-format",
                "html-format",
                "xml-format"
            ]
        );
    }
}
