//! TypeScript writer.
//!
//! Renders the lowering engine's fragments as TypeScript and lays out one
//! module per class. Renamed constructors become ordinary methods that
//! return `this`, so `new C(a)` with overloads turns into
//! `new C().New2(a)`. `out`/`ref` arguments travel in `{ value }` boxes.

use crate::error::LowerError;
use crate::lower::{LoweredBody, LoweringEngine};
use crate::render::{Fragment, Renderer};
use crate::traits::{ClassOutput, Writer};
use retarget_model::{
    AccessType, Class, ClassId, ContainerSyntax, DeclarationType, Function, ImportTracker,
    KnownClass, KnownClasses, Parameter, ParameterModifiers, TypeMap, TypeMapper, Variable,
    VariableType,
};
use retarget_syntax::{
    AccessorKind, AssignOp, BinaryOp, InitializerShape, InitializerTarget, LiteralKind, UnaryOp,
};

/// Static instance of the TypeScript writer for registry.
pub static TYPESCRIPT_WRITER: TypeScriptWriterImpl = TypeScriptWriterImpl;

/// Name the catch clause binds when the source leaves it anonymous; a bare
/// rethrow refers to it.
const CATCH_BINDING: &str = "e";

/// TypeScript writer implementing the Writer trait.
pub struct TypeScriptWriterImpl;

impl Writer for TypeScriptWriterImpl {
    fn language(&self) -> &'static str {
        "typescript"
    }

    fn extension(&self) -> &'static str {
        "ts"
    }

    fn primitive_types(&self) -> TypeMap {
        [
            ("sbyte", "number"),
            ("byte", "number"),
            ("short", "number"),
            ("ushort", "number"),
            ("int", "number"),
            ("uint", "number"),
            ("long", "number"),
            ("ulong", "number"),
            ("float", "number"),
            ("double", "number"),
            ("decimal", "number"),
            ("bool", "boolean"),
            ("char", "string"),
            ("string", "string"),
            ("String", "string"),
            ("object", "any"),
            ("Object", "any"),
            ("dynamic", "any"),
            ("void", "void"),
        ]
        .into_iter()
        .collect()
    }

    fn preprocessor_symbols(&self) -> &'static [&'static str] {
        &["TYPESCRIPT"]
    }

    fn known_classes(&self) -> KnownClasses {
        let mut known = KnownClasses::new();
        known.register(KnownClass::new("Exception", "Error"));
        known.register(KnownClass::new("DateTime", "Date"));
        known.register(KnownClass::new("Math", "Math"));
        known.register(KnownClass::new("Task", "Promise").with_arity(1));
        known
    }

    fn renderer(&self) -> &dyn Renderer {
        self
    }

    fn write_class(
        &self,
        engine: &LoweringEngine<'_>,
        class: ClassId,
    ) -> Result<ClassOutput, LowerError> {
        TypeScriptWriter::new(engine, self, class).emit()
    }
}

impl ContainerSyntax for TypeScriptWriterImpl {
    fn array(&self, element: &str) -> String {
        if element.contains(' ') {
            format!("({})[]", element)
        } else {
            format!("{}[]", element)
        }
    }

    fn list(&self, element: &str) -> String {
        self.array(element)
    }

    fn dictionary(&self, key: &str, value: &str) -> String {
        format!("Map<{}, {}>", key, value)
    }

    fn tuple(&self, elements: &[String]) -> String {
        format!("[{}]", elements.join(", "))
    }

    fn callback(&self, params: &[String], returns: Option<&str>) -> String {
        let params: Vec<String> = params
            .iter()
            .enumerate()
            .map(|(i, p)| format!("a{}: {}", i, p))
            .collect();
        format!("({}) => {}", params.join(", "), returns.unwrap_or("void"))
    }

    fn generic(&self, name: &str, args: &[String]) -> String {
        format!("{}<{}>", name, args.join(", "))
    }

    fn nullable(&self, inner: &str) -> String {
        format!("{} | null", inner)
    }

    fn unknown(&self) -> String {
        "any".to_string()
    }
}

impl Renderer for TypeScriptWriterImpl {
    fn indent_unit(&self) -> &'static str {
        "  "
    }

    fn assignment(&self, target: &str, op: AssignOp, value: &str) -> String {
        format!("{} {} {}", target, op.token(), value)
    }

    fn this_member(&self, member: &str) -> String {
        format!("this.{}", member)
    }

    fn static_member(&self, class: &str, member: &str) -> String {
        format!("{}.{}", class, member)
    }

    fn member_access(&self, target: &str, member: &str) -> String {
        format!("{}.{}", target, member)
    }

    fn object_creation(
        &self,
        ty: &str,
        constructor: Option<&str>,
        args: &[String],
        initializer: Option<&str>,
    ) -> String {
        // Lists map to plain arrays.
        if ty.ends_with("[]") {
            return initializer.unwrap_or("[]").to_string();
        }
        let created = match constructor {
            Some(constructor) => format!("new {}().{}({})", ty, constructor, args.join(", ")),
            None => format!("new {}({})", ty, args.join(", ")),
        };
        match initializer {
            Some(init) if init.starts_with('[') && args.is_empty() && constructor.is_none() => {
                format!("new {}({})", ty, init)
            }
            Some(init) => format!("Object.assign({}, {})", created, init),
            None => created,
        }
    }

    fn invocation(&self, target: &str, args: &[String]) -> String {
        format!("{}({})", target, args.join(", "))
    }

    fn this_expr(&self) -> String {
        "this".to_string()
    }

    fn base_expr(&self) -> String {
        "super".to_string()
    }

    fn literal(&self, kind: LiteralKind, text: &str) -> String {
        match kind {
            LiteralKind::Numeric => strip_numeric_suffix(text).to_string(),
            LiteralKind::String => format!("\"{}\"", text),
            LiteralKind::Char => format!("'{}'", text),
            LiteralKind::True => "true".to_string(),
            LiteralKind::False => "false".to_string(),
            LiteralKind::Null => "null".to_string(),
            LiteralKind::Default => "undefined".to_string(),
        }
    }

    fn binary(&self, left: &str, op: BinaryOp, right: &str) -> String {
        match op {
            BinaryOp::Eq => format!("{} === {}", left, right),
            BinaryOp::Ne => format!("{} !== {}", left, right),
            BinaryOp::Is => format!("{} instanceof {}", left, right),
            BinaryOp::As => format!("({} as {})", left, right),
            op => format!("{} {} {}", left, op.token(), right),
        }
    }

    fn generic_name(&self, name: &str, args: &[String]) -> String {
        self.generic(name, args)
    }

    fn lambda_parameter(&self, name: &str, ty: Option<&str>) -> String {
        match ty {
            Some(ty) => format!("{}: {}", name, ty),
            None => name.to_string(),
        }
    }

    fn lambda(&self, params: &[String], body: &str) -> String {
        format!("({}) => {}", params.join(", "), body)
    }

    fn conditional(&self, condition: &str, when_true: &str, when_false: &str) -> String {
        format!("{} ? {} : {}", condition, when_true, when_false)
    }

    fn cast(&self, ty: &str, operand: &str) -> String {
        format!("({} as {})", operand, ty)
    }

    fn conditional_access(&self, target: &str, rest: &str) -> String {
        format!("{}{}", target, rest)
    }

    fn member_binding(&self, member: &str) -> String {
        format!("?.{}", member)
    }

    fn prefix_unary(&self, op: UnaryOp, operand: &str) -> String {
        format!("{}{}", op.token(), operand)
    }

    fn postfix_unary(&self, op: UnaryOp, operand: &str) -> String {
        format!("{}{}", operand, op.token())
    }

    fn element_access(&self, target: &str, args: &[String]) -> String {
        format!("{}[{}]", target, args.join("]["))
    }

    fn interpolated_string(&self, parts: &[Fragment]) -> String {
        let mut out = String::from("`");
        for part in parts {
            match part {
                Fragment::Text(text) => {
                    out.push_str(&text.replace('`', "\\`").replace("${", "\\${"))
                }
                Fragment::Code { code, .. } => {
                    out.push_str("${");
                    out.push_str(code);
                    out.push('}');
                }
            }
        }
        out.push('`');
        out
    }

    fn default_value(&self, ty: Option<&str>) -> String {
        match ty {
            Some(_) => "null".to_string(),
            None => "undefined".to_string(),
        }
    }

    fn type_reference(&self, ty: &str) -> String {
        ty.to_string()
    }

    fn tuple_literal(&self, elements: &[String]) -> String {
        format!("[{}]", elements.join(", "))
    }

    fn initializer(&self, shape: InitializerShape, elements: &[String]) -> String {
        match shape {
            InitializerShape::Object if elements.is_empty() => "{}".to_string(),
            InitializerShape::Object => format!("{{ {} }}", elements.join(", ")),
            InitializerShape::Collection | InitializerShape::Array | InitializerShape::Complex => {
                format!("[{}]", elements.join(", "))
            }
        }
    }

    fn initializer_member(&self, name: &str, value: &str) -> String {
        format!("{}: {}", name, value)
    }

    fn parenthesized(&self, inner: &str) -> String {
        format!("({})", inner)
    }

    fn array_creation(&self, element: &str, sizes: &[String], initializer: Option<&str>) -> String {
        match (initializer, sizes.first()) {
            (Some(init), _) => init.to_string(),
            (None, Some(size)) => format!("new Array<{}>({})", element, size),
            (None, None) => "[]".to_string(),
        }
    }

    fn type_of(&self, ty: &str) -> String {
        ty.to_string()
    }

    fn await_expr(&self, operand: &str) -> String {
        format!("await {}", operand)
    }

    fn implicit_array(&self, initializer: &str) -> String {
        initializer.to_string()
    }

    fn declaration_expression(&self, name: &str) -> String {
        name.to_string()
    }

    fn out_temp_declaration(&self, temp: &str, initial: Option<&str>) -> String {
        format!(
            "const {}: {{ value: any }} = {{ value: {} }};",
            temp,
            initial.unwrap_or("undefined")
        )
    }

    fn out_temp_argument(&self, temp: &str) -> String {
        temp.to_string()
    }

    fn out_temp_value(&self, temp: &str) -> String {
        format!("{}.value", temp)
    }

    fn out_parameter_value(&self, parameter: &str) -> String {
        format!("{}.value", parameter)
    }

    fn expression_statement(&self, expr: &str) -> String {
        format!("{};", expr)
    }

    fn return_statement(&self, value: Option<&str>) -> String {
        match value {
            Some(value) => format!("return {};", value),
            None => "return;".to_string(),
        }
    }

    fn local_declaration(
        &self,
        name: &str,
        ty: Option<&str>,
        init: Option<&str>,
        mutable: bool,
    ) -> String {
        let keyword = if mutable || init.is_none() {
            "let"
        } else {
            "const"
        };
        let mut out = format!("{} {}", keyword, name);
        if let Some(ty) = ty {
            out.push_str(": ");
            out.push_str(ty);
        }
        if let Some(init) = init {
            out.push_str(" = ");
            out.push_str(init);
        }
        out.push(';');
        out
    }

    fn declaration_clause(&self, declarators: &[(String, Option<String>)]) -> String {
        let parts: Vec<String> = declarators
            .iter()
            .map(|(name, init)| match init {
                Some(init) => format!("{} = {}", name, init),
                None => name.clone(),
            })
            .collect();
        format!("let {}", parts.join(", "))
    }

    fn throw_statement(&self, value: Option<&str>) -> String {
        format!("throw {};", value.unwrap_or(CATCH_BINDING))
    }

    fn break_statement(&self) -> String {
        "break;".to_string()
    }

    fn continue_statement(&self) -> String {
        "continue;".to_string()
    }

    fn block_open(&self) -> String {
        "{".to_string()
    }

    fn block_close(&self) -> String {
        "}".to_string()
    }

    fn if_header(&self, condition: &str) -> String {
        format!("if ({}) {{", condition)
    }

    fn else_if_header(&self, condition: &str) -> String {
        format!("}} else if ({}) {{", condition)
    }

    fn else_header(&self) -> String {
        "} else {".to_string()
    }

    fn while_header(&self, condition: &str) -> String {
        format!("while ({}) {{", condition)
    }

    fn do_header(&self) -> String {
        "do {".to_string()
    }

    fn do_footer(&self, condition: &str) -> String {
        format!("}} while ({});", condition)
    }

    fn for_header(
        &self,
        init: Option<&str>,
        condition: Option<&str>,
        incrementors: &[String],
    ) -> String {
        format!(
            "for ({}; {}; {}) {{",
            init.unwrap_or(""),
            condition.unwrap_or(""),
            incrementors.join(", ")
        )
    }

    fn for_each_header(&self, name: &str, _ty: Option<&str>, iterable: &str) -> String {
        format!("for (const {} of {}) {{", name, iterable)
    }

    fn switch_header(&self, subject: &str) -> String {
        format!("switch ({}) {{", subject)
    }

    fn case_label(&self, value: &str) -> String {
        format!("case {}:", value)
    }

    fn default_label(&self) -> String {
        "default:".to_string()
    }

    fn try_header(&self) -> String {
        "try {".to_string()
    }

    // Catch bindings cannot carry a type annotation.
    fn catch_header(&self, name: Option<&str>, _ty: Option<&str>) -> String {
        format!("}} catch ({}) {{", name.unwrap_or(CATCH_BINDING))
    }

    fn finally_header(&self) -> String {
        "} finally {".to_string()
    }

    fn dispose(&self, target: &str) -> String {
        format!("{}.Dispose();", target)
    }

    fn constructor_chain(
        &self,
        target: InitializerTarget,
        constructor: Option<&str>,
        args: &[String],
    ) -> String {
        let receiver = match target {
            InitializerTarget::Base => "super",
            InitializerTarget::This => "this",
        };
        match (target, constructor) {
            (_, Some(constructor)) => format!("{}.{}({});", receiver, constructor, args.join(", ")),
            (InitializerTarget::Base, None) => format!("super({});", args.join(", ")),
            (InitializerTarget::This, None) => {
                format!("this.constructor({});", args.join(", "))
            }
        }
    }
}

/// Strip `f`/`d`/`m`/`L`/`u` suffixes from a numeric token.
fn strip_numeric_suffix(text: &str) -> &str {
    let hex = text.starts_with("0x") || text.starts_with("0X");
    let suffixes: &[char] = if hex {
        &['l', 'L', 'u', 'U']
    } else {
        &['f', 'F', 'd', 'D', 'm', 'M', 'l', 'L', 'u', 'U']
    };
    text.trim_end_matches(suffixes)
}

/// Field assignment text as a TypeScript initializer.
fn field_value(assignment: &str) -> Option<String> {
    if assignment == "default" {
        return None;
    }
    let digits = assignment.strip_prefix('-').unwrap_or(assignment);
    if digits.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return Some(strip_numeric_suffix(assignment).to_string());
    }
    Some(assignment.to_string())
}

fn access(access: AccessType) -> &'static str {
    match access {
        AccessType::Public | AccessType::Internal => "public ",
        AccessType::Protected => "protected ",
        AccessType::Private => "private ",
    }
}

fn static_keyword(is_static: bool) -> &'static str {
    if is_static { "static " } else { "" }
}

fn generic_params(args: &[String]) -> String {
    if args.is_empty() {
        String::new()
    } else {
        format!("<{}>", args.join(", "))
    }
}

/// Emits one class as a TypeScript module.
pub struct TypeScriptWriter<'e, 'a> {
    engine: &'e LoweringEngine<'a>,
    syntax: &'e TypeScriptWriterImpl,
    id: ClassId,
    class: &'a Class,
    output: String,
    indent: usize,
    imports: ImportTracker,
    referenced: Vec<String>,
}

impl<'e, 'a> TypeScriptWriter<'e, 'a> {
    pub fn new(
        engine: &'e LoweringEngine<'a>,
        syntax: &'e TypeScriptWriterImpl,
        id: ClassId,
    ) -> Self {
        Self {
            engine,
            syntax,
            id,
            class: engine.program().class(id),
            output: String::new(),
            indent: 0,
            imports: ImportTracker::new(),
            referenced: Vec::new(),
        }
    }

    pub fn emit(mut self) -> Result<ClassOutput, LowerError> {
        match self.class.declaration {
            DeclarationType::Enum => self.write_enum(),
            DeclarationType::Delegate => self.write_delegate(),
            DeclarationType::Interface => self.write_interface(),
            _ => self.write_class()?,
        }

        let mut header = String::new();
        for import in self.imports.drain() {
            header.push_str(&import);
            header.push('\n');
        }
        let mut referenced = self.referenced.clone();
        referenced.sort();
        for name in &referenced {
            header.push_str(&format!("import {{ {} }} from \"./{}\";\n", name, name));
        }
        if !header.is_empty() {
            header.push('\n');
        }
        header.push_str(&self.output);

        Ok(ClassOutput {
            contents: header,
            referenced_classes: self.referenced,
        })
    }

    fn write_line(&mut self, line: &str) {
        if line.is_empty() {
            self.output.push('\n');
            return;
        }
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn write_body(&mut self, body: LoweredBody) {
        self.indent += 1;
        for line in &body.lines {
            for part in line.split('\n') {
                self.write_line(part);
            }
        }
        self.indent -= 1;
        self.imports.merge(body.imports);
        for name in body.referenced_classes {
            self.note(&name);
        }
    }

    fn note(&mut self, name: &str) {
        if name != self.class.name
            && self.engine.program().find_class(name).is_some()
            && !self.referenced.iter().any(|r| r == name)
        {
            self.referenced.push(name.to_string());
        }
    }

    fn map(&mut self, ty: &VariableType) -> String {
        self.note_type(ty);
        let program = self.engine.program();
        TypeMapper::new(&program.type_map, self.engine.known(), self.syntax)
            .map(ty, &mut self.imports)
    }

    fn note_type(&mut self, ty: &VariableType) {
        self.note(&ty.name);
        for arg in ty.args.iter().chain(&ty.generic_args) {
            self.note_type(arg);
        }
    }

    fn parameters(&mut self, params: &[Parameter]) -> String {
        let mut out = Vec::with_capacity(params.len());
        for param in params {
            let ty = self.map(&param.ty);
            let mut text = if param.modifiers.is_by_reference() {
                format!("{}: {{ value: {} }}", param.name, ty)
            } else if param.modifiers.contains(ParameterModifiers::PARAMS) {
                format!("...{}: {}", param.name, ty)
            } else {
                format!("{}: {}", param.name, ty)
            };
            if let Some(value) = param.default.as_deref().and_then(field_value) {
                text.push_str(" = ");
                text.push_str(&value);
            }
            out.push(text);
        }
        out.join(", ")
    }

    fn return_type(&mut self, function: &Function) -> String {
        let ty = match function.effective_return_type() {
            Some(ty) => self.map(ty),
            None => "void".to_string(),
        };
        if function.is_async {
            format!("Promise<{}>", ty)
        } else {
            ty
        }
    }

    fn write_enum(&mut self) {
        self.write_line(&format!("export enum {} {{", self.class.name));
        self.indent += 1;
        for member in &self.class.enum_members {
            self.write_line(&format!("{},", member));
        }
        self.indent -= 1;
        self.write_line("}");
    }

    fn write_delegate(&mut self) {
        let class = self.class;
        let signature = match class.functions.first() {
            Some(invoke) => {
                let params = self.parameters(&invoke.parameters);
                let returns = self.return_type(invoke);
                format!("({}) => {}", params, returns)
            }
            None => "() => void".to_string(),
        };
        self.write_line(&format!(
            "export type {}{} = {};",
            class.name,
            generic_params(&class.generic_args),
            signature
        ));
    }

    fn write_interface(&mut self) {
        let class = self.class;
        for ext in &class.extensions {
            self.note(ext);
        }
        let extends = if class.extensions.is_empty() {
            String::new()
        } else {
            format!(" extends {}", class.extensions.join(", "))
        };
        self.write_line(&format!(
            "export interface {}{}{} {{",
            class.name,
            generic_params(&class.generic_args),
            extends
        ));
        self.indent += 1;
        for var in &class.variables {
            let ty = self.map(&var.ty);
            let readonly = if var.has_set { "" } else { "readonly " };
            self.write_line(&format!("{}{}: {};", readonly, var.emitted_name(), ty));
        }
        for function in &class.functions {
            let params = self.parameters(&function.parameters);
            let returns = self.return_type(function);
            self.write_line(&format!(
                "{}{}({}): {};",
                function.emitted_name(),
                generic_params(&function.generic_args),
                params,
                returns
            ));
        }
        self.indent -= 1;
        self.write_line("}");
    }

    fn write_class(&mut self) -> Result<(), LowerError> {
        let class = self.class;
        let program = self.engine.program();

        let mut base = None;
        let mut interfaces = Vec::new();
        for ext in &class.extensions {
            self.note(ext);
            let is_interface = program
                .find_class(ext)
                .is_some_and(|id| program.class(id).is_interface());
            if is_interface || base.is_some() {
                interfaces.push(ext.as_str());
            } else {
                base = Some(ext.as_str());
            }
        }
        let mut header = String::from("export ");
        if class.declaration == DeclarationType::Abstract {
            header.push_str("abstract ");
        }
        header.push_str(&format!(
            "class {}{}",
            class.name,
            generic_params(&class.generic_args)
        ));
        if let Some(base) = base {
            header.push_str(&format!(" extends {}", base));
        }
        if !interfaces.is_empty() {
            header.push_str(&format!(" implements {}", interfaces.join(", ")));
        }
        header.push_str(" {");
        self.write_line(&header);

        self.indent += 1;
        for (index, var) in class.variables.iter().enumerate() {
            self.write_variable(index, var)?;
        }
        for (index, function) in class.functions.iter().enumerate() {
            if index > 0 || !class.variables.is_empty() {
                self.write_line("");
            }
            self.write_function(index, function)?;
        }
        self.indent -= 1;
        self.write_line("}");
        Ok(())
    }

    fn write_variable(&mut self, index: usize, var: &Variable) -> Result<(), LowerError> {
        let ty = self.map(&var.ty);
        let prefix = format!("{}{}", access(var.access), static_keyword(var.is_static));

        if var.is_plain() {
            let readonly = if var.is_readonly { "readonly " } else { "" };
            let value = match &var.assignment {
                Some(assignment) => field_value(assignment),
                None => match self.engine.lower_initializer(self.id, index)? {
                    Some(body) => {
                        self.imports.merge(body.imports);
                        for name in &body.referenced_classes {
                            self.note(name);
                        }
                        body.lines.into_iter().next()
                    }
                    None => None,
                },
            };
            let line = match value {
                Some(value) => format!(
                    "{}{}{}: {} = {};",
                    prefix,
                    readonly,
                    var.emitted_name(),
                    ty,
                    value
                ),
                None => format!("{}{}{}: {};", prefix, readonly, var.emitted_name(), ty),
            };
            self.write_line(&line);
            return Ok(());
        }

        if var.expression_body.is_some() || var.get_body.is_some() {
            let body = self.engine.lower_accessor(self.id, index, AccessorKind::Get)?;
            self.write_line(&format!("{}get {}(): {} {{", prefix, var.emitted_name(), ty));
            self.write_body(body);
            self.write_line("}");
        }
        if var.set_body.is_some() {
            let body = self.engine.lower_accessor(self.id, index, AccessorKind::Set)?;
            self.write_line(&format!(
                "{}set {}(value: {}) {{",
                prefix,
                var.emitted_name(),
                ty
            ));
            self.write_body(body);
            self.write_line("}");
        }
        Ok(())
    }

    fn write_function(&mut self, index: usize, function: &Function) -> Result<(), LowerError> {
        let params = self.parameters(&function.parameters);

        if function.is_constructor {
            let body = self.engine.lower_function(self.id, index)?;
            if function.is_static {
                self.write_line("static {");
                self.write_body(body);
            } else if let Some(remap) = &function.remap {
                self.write_line(&format!(
                    "{}{}({}): {} {{",
                    access(function.access),
                    remap,
                    params,
                    self.class.name
                ));
                self.write_body(body);
                self.indent += 1;
                self.write_line("return this;");
                self.indent -= 1;
            } else {
                self.write_line(&format!("constructor({}) {{", params));
                self.write_body(body);
            }
            self.write_line("}");
            return Ok(());
        }

        let returns = self.return_type(function);
        let signature = format!(
            "{}({}): {}",
            generic_params(&function.generic_args),
            params,
            returns
        );
        if function.body.is_none() {
            let modifier = if function.declaration == DeclarationType::Abstract {
                "abstract "
            } else {
                ""
            };
            self.write_line(&format!(
                "{}{}{}{};",
                access(function.access),
                modifier,
                function.emitted_name(),
                signature
            ));
            return Ok(());
        }

        let body = self.engine.lower_function(self.id, index)?;
        let is_async = if function.is_async { "async " } else { "" };
        self.write_line(&format!(
            "{}{}{}{}{} {{",
            access(function.access),
            static_keyword(function.is_static),
            is_async,
            function.emitted_name(),
            signature
        ));
        self.write_body(body);
        self.write_line("}");
        Ok(())
    }
}
