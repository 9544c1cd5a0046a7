//! Thin textual code-assembly facility.
//!
//! The emitter describes compilation units structurally (classes, methods,
//! bodies, XML docs) and this module renders them into deterministic source
//! text. It intentionally covers only the shapes the registrator output
//! needs; formatting (4-space indent, brace placement) is part of the
//! snapshot-stability contract of the generated code.

const INDENT: &str = "    ";

/// Access modifier of a class or method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessModifier {
    Public,
    Internal,
    Protected,
    Private,
}

impl AccessModifier {
    fn as_str(self) -> &'static str {
        match self {
            AccessModifier::Public => "public",
            AccessModifier::Internal => "internal",
            AccessModifier::Protected => "protected",
            AccessModifier::Private => "private",
        }
    }
}

/// A method parameter (type, name).
#[derive(Debug, Clone)]
pub struct ParameterInfo {
    pub param_type: String,
    pub name: String,
}

impl ParameterInfo {
    pub fn new(param_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            param_type: param_type.into(),
            name: name.into(),
        }
    }
}

/// A method of a generated class.
#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub access: Option<AccessModifier>,
    pub return_type: String,
    pub name: String,
    pub is_partial: bool,
    pub is_override: bool,
    pub is_static: bool,
    /// Renders the first parameter with a `this` modifier.
    pub is_extension_method: bool,
    pub inherit_doc: bool,
    pub xml_doc_summary: Option<String>,
    pub xml_doc_additional_lines: Vec<String>,
    pub parameters: Vec<ParameterInfo>,
    /// `None` renders a bodiless partial declaration.
    pub body: Option<Vec<String>>,
}

impl MethodInfo {
    pub fn new(
        access: Option<AccessModifier>,
        return_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            access,
            return_type: return_type.into(),
            name: name.into(),
            is_partial: false,
            is_override: false,
            is_static: false,
            is_extension_method: false,
            inherit_doc: false,
            xml_doc_summary: None,
            xml_doc_additional_lines: Vec::new(),
            parameters: Vec::new(),
            body: None,
        }
    }

    /// A bodiless `partial void` hook declaration.
    pub fn partial_declaration(name: impl Into<String>) -> Self {
        let mut method = Self::new(None, "void", name);
        method.is_partial = true;
        method
    }

    /// A `partial void` hook with an implementation body.
    pub fn partial_implementation(name: impl Into<String>, body: Vec<String>) -> Self {
        let mut method = Self::partial_declaration(name);
        method.body = Some(body);
        method
    }

    pub fn with_parameter(mut self, param_type: impl Into<String>, name: impl Into<String>) -> Self {
        self.parameters.push(ParameterInfo::new(param_type, name));
        self
    }

    pub fn with_override(mut self) -> Self {
        self.is_override = true;
        self
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_extension(mut self) -> Self {
        self.is_extension_method = true;
        self.is_static = true;
        self
    }

    pub fn with_inherit_doc(mut self) -> Self {
        self.inherit_doc = true;
        self
    }

    pub fn with_xml_doc(mut self, summary: impl Into<String>) -> Self {
        self.xml_doc_summary = Some(summary.into());
        self
    }

    pub fn with_xml_doc_line(mut self, line: impl Into<String>) -> Self {
        self.xml_doc_additional_lines.push(line.into());
        self
    }

    pub fn with_body(mut self, body: Vec<String>) -> Self {
        self.body = Some(body);
        self
    }

    fn render(&self, out: &mut String, depth: usize) {
        let pad = INDENT.repeat(depth);

        if self.inherit_doc {
            out.push_str(&format!("{}/// <inheritdoc />\n", pad));
        } else if let Some(summary) = &self.xml_doc_summary {
            out.push_str(&format!("{}/// <summary>\n", pad));
            for line in summary.lines() {
                out.push_str(&format!("{}/// {}\n", pad, line));
            }
            out.push_str(&format!("{}/// </summary>\n", pad));
            for line in &self.xml_doc_additional_lines {
                out.push_str(&format!("{}/// {}\n", pad, line));
            }
        }

        let mut signature = String::new();
        if let Some(access) = self.access {
            signature.push_str(access.as_str());
            signature.push(' ');
        }
        if self.is_static {
            signature.push_str("static ");
        }
        if self.is_override {
            signature.push_str("override ");
        }
        if self.is_partial {
            signature.push_str("partial ");
        }
        signature.push_str(&self.return_type);
        signature.push(' ');
        signature.push_str(&self.name);
        signature.push('(');
        for (index, parameter) in self.parameters.iter().enumerate() {
            if index > 0 {
                signature.push_str(", ");
            }
            if index == 0 && self.is_extension_method {
                signature.push_str("this ");
            }
            signature.push_str(&parameter.param_type);
            signature.push(' ');
            signature.push_str(&parameter.name);
        }
        signature.push(')');

        match &self.body {
            None => {
                out.push_str(&format!("{}{};\n", pad, signature));
            }
            Some(body) => {
                out.push_str(&format!("{}{}\n", pad, signature));
                out.push_str(&format!("{}{{\n", pad));
                for line in body {
                    if line.is_empty() {
                        out.push('\n');
                    } else {
                        out.push_str(&format!("{}{}{}\n", pad, INDENT, line));
                    }
                }
                out.push_str(&format!("{}}}\n", pad));
            }
        }
    }
}

/// A class of a generated compilation unit.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub name: String,
    pub access: AccessModifier,
    pub is_partial: bool,
    pub is_sealed: bool,
    pub is_static: bool,
    pub base_class: Option<String>,
    pub xml_doc_summary: Option<String>,
    pub methods: Vec<MethodInfo>,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>, access: AccessModifier) -> Self {
        Self {
            name: name.into(),
            access,
            is_partial: false,
            is_sealed: false,
            is_static: false,
            base_class: None,
            xml_doc_summary: None,
            methods: Vec::new(),
        }
    }

    pub fn partial(mut self) -> Self {
        self.is_partial = true;
        self
    }

    pub fn sealed(mut self) -> Self {
        self.is_sealed = true;
        self
    }

    pub fn static_class(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_base(mut self, base_class: impl Into<String>) -> Self {
        self.base_class = Some(base_class.into());
        self
    }

    pub fn with_xml_doc(mut self, summary: impl Into<String>) -> Self {
        self.xml_doc_summary = Some(summary.into());
        self
    }

    pub fn with_method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    fn render(&self, out: &mut String, add_generated_code_attributes: bool) {
        let pad = INDENT;

        if let Some(summary) = &self.xml_doc_summary {
            out.push_str(&format!("{}/// <summary>\n", pad));
            for line in summary.lines() {
                out.push_str(&format!("{}/// {}\n", pad, line));
            }
            out.push_str(&format!("{}/// </summary>\n", pad));
        }

        if add_generated_code_attributes {
            out.push_str(&format!(
                "{}[global::System.CodeDom.Compiler.GeneratedCodeAttribute(\"regchain\", \"{}\")]\n",
                pad,
                env!("CARGO_PKG_VERSION")
            ));
        }

        let mut header = String::new();
        header.push_str(self.access.as_str());
        header.push(' ');
        if self.is_static {
            header.push_str("static ");
        }
        if self.is_sealed {
            header.push_str("sealed ");
        }
        header.push_str("class ");
        if self.is_partial {
            header.insert_str(header.len() - "class ".len(), "partial ");
        }
        header.push_str(&self.name);
        if let Some(base) = &self.base_class {
            header.push_str(" : ");
            header.push_str(base);
        }

        out.push_str(&format!("{}{}\n", pad, header));
        out.push_str(&format!("{}{{\n", pad));

        for (index, method) in self.methods.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            method.render(out, 2);
        }

        out.push_str(&format!("{}}}\n", pad));
    }
}

/// One generated compilation unit: usings, a target namespace and its
/// classes, rendered to final source text.
#[derive(Debug, Clone)]
pub struct CompilationInfo {
    pub hint_name: String,
    pub target_namespace: String,
    pub usings: Vec<String>,
    pub add_generated_code_attributes: bool,
    pub classes: Vec<ClassInfo>,
}

impl CompilationInfo {
    pub fn new(hint_name: impl Into<String>, target_namespace: impl Into<String>) -> Self {
        Self {
            hint_name: hint_name.into(),
            target_namespace: target_namespace.into(),
            usings: Vec::new(),
            add_generated_code_attributes: true,
            classes: Vec::new(),
        }
    }

    pub fn add_using(&mut self, using: impl Into<String>) {
        self.usings.push(using.into());
    }

    pub fn add_class(&mut self, class: ClassInfo) {
        self.classes.push(class);
    }

    /// Renders the unit as source text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("// <auto-generated/>\n");
        out.push_str("#nullable enable\n");

        if !self.usings.is_empty() {
            out.push('\n');
            for using in &self.usings {
                out.push_str(&format!("using {};\n", using));
            }
        }

        out.push('\n');
        out.push_str(&format!("namespace {}\n", self.target_namespace));
        out.push_str("{\n");

        for (index, class) in self.classes.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            class.render(&mut out, self.add_generated_code_attributes);
        }

        out.push_str("}\n");
        out
    }
}
