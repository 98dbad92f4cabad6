use super::*;
use crate::discovery::{SourceUnit, discover};
use crate::output::TYPESCRIPT_WRITER;
use crate::resolve::resolve_program;
use crate::traits::Writer;
use pretty_assertions::assert_eq;
use retarget_model::Rules;
use retarget_syntax::{
    Annotations, Argument, BinaryOp, CatchClause, ConstructorDecl, Declarator, Document, Expr,
    FieldDecl, InitializerTarget, Member, MethodDecl, ParameterDecl, Stmt, SwitchLabel,
    SwitchSection, Symbol, SymbolKind, TypeDecl, VariableDeclaration,
};

fn int() -> TypeSyntax {
    TypeSyntax::predefined("int")
}

fn void() -> TypeSyntax {
    TypeSyntax::predefined("void")
}

fn method(name: &str, returns: TypeSyntax, body: Vec<Stmt>) -> Member {
    Member::Method(
        MethodDecl::new(name, returns)
            .with_modifiers(&["public"])
            .with_body(body),
    )
}

fn field(modifiers: &[&str], ty: TypeSyntax, name: &str) -> Member {
    Member::Field(FieldDecl {
        modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
        ty,
        declarators: vec![Declarator::new(name, None)],
    })
}

fn call(name: &str, args: Vec<Argument>) -> Expr {
    Expr::call(Expr::ident(name), args)
}

/// `bool TryGet(out int value)` without a body.
fn out_method(name: &str, returns: TypeSyntax) -> Member {
    Member::Method(
        MethodDecl::new(name, returns)
            .with_modifiers(&["public"])
            .with_param(ParameterDecl::new("value", int()).with_modifier("out")),
    )
}

fn program_of(members: Vec<Member>, annotations: Annotations) -> Program {
    let mut program = Program::new(Rules::default(), TYPESCRIPT_WRITER.primitive_types());
    let document = Document::new("Test.cs", members).with_annotations(annotations);
    discover(&mut program, SourceUnit::from(document)).unwrap();
    resolve_program(&mut program);
    program.freeze();
    program
}

fn class_c(members: Vec<Member>) -> Program {
    let mut class = TypeDecl::class("C");
    class.members = members;
    program_of(vec![Member::Type(class)], Annotations::new())
}

fn lower(program: &Program, class: &str, method: &str) -> Result<LoweredBody, LowerError> {
    let known = TYPESCRIPT_WRITER.known_classes();
    let engine = LoweringEngine::new(program, TYPESCRIPT_WRITER.renderer(), &known);
    let id = program.find_class(class).unwrap();
    let index = program.class(id).function(method, None).unwrap();
    engine.lower_function(id, index)
}

fn lines(program: &Program, class: &str, method: &str) -> Vec<String> {
    lower(program, class, method).unwrap().lines
}

#[test]
fn out_argument_is_boxed_and_written_back() {
    let program = class_c(vec![
        Member::Method(
            MethodDecl::new("Foo", void())
                .with_param(ParameterDecl::new("v", int()).with_modifier("out"))
                .with_body(vec![Stmt::expr(Expr::assign(
                    Expr::ident("v"),
                    Expr::number("5"),
                ))]),
        ),
        method(
            "Run",
            void(),
            vec![
                Stmt::local(Some(int()), "x", Some(Expr::number("1"))),
                Stmt::expr(call("Foo", vec![Argument::out(Expr::ident("x"))])),
            ],
        ),
    ]);

    assert_eq!(
        lines(&program, "C", "Run"),
        vec![
            "let x: number = 1;",
            "const out_1: { value: any } = { value: undefined };",
            "this.Foo(out_1);",
            "x = out_1.value;",
        ]
    );
    assert_eq!(lines(&program, "C", "Foo"), vec!["v.value = 5;"]);
}

#[test]
fn out_declaration_is_declared_after_the_call() {
    let program = class_c(vec![
        out_method("TryGet", TypeSyntax::predefined("bool")),
        method(
            "Get",
            int(),
            vec![
                Stmt::expr(call("TryGet", vec![Argument::out(Expr::declaration("y"))])),
                Stmt::ret(Some(Expr::ident("y"))),
            ],
        ),
    ]);

    assert_eq!(
        lines(&program, "C", "Get"),
        vec![
            "const out_1: { value: any } = { value: undefined };",
            "this.TryGet(out_1);",
            "const y = out_1.value;",
            "return y;",
        ]
    );
}

#[test]
fn binary_operands_do_not_share_a_receiver() {
    let program = class_c(vec![
        field(&["public"], int(), "Count"),
        method(
            "Total",
            int(),
            vec![Stmt::ret(Some(Expr::binary(
                Expr::member(Expr::this(), "Count"),
                BinaryOp::Add,
                Expr::ident("Count"),
            )))],
        ),
    ]);

    assert_eq!(
        lines(&program, "C", "Total"),
        vec!["return this.Count + this.Count;"]
    );
}

#[test]
fn static_members_are_qualified_by_class() {
    let program = class_c(vec![
        field(&["public", "static"], int(), "Max"),
        method("Limit", int(), vec![Stmt::ret(Some(Expr::ident("Max")))]),
    ]);

    assert_eq!(lines(&program, "C", "Limit"), vec!["return C.Max;"]);
}

#[test]
fn oracle_symbol_decides_static_owner() {
    let mut class = TypeDecl::class("C");
    class.members = vec![method(
        "Level",
        int(),
        vec![Stmt::ret(Some(Expr::ident("Volume").with_id(7)))],
    )];
    let annotations = Annotations::new().with_symbol(
        7,
        Symbol::new(SymbolKind::Field, "Volume")
            .member_of("Config")
            .with_static(true),
    );
    let program = program_of(vec![Member::Type(class)], annotations);

    assert_eq!(lines(&program, "C", "Level"), vec!["return Config.Volume;"]);
}

#[test]
fn unknown_statement_fails_with_its_kind() {
    let program = class_c(vec![method("Jump", void(), vec![Stmt::other("goto_statement")])]);

    let err = lower(&program, "C", "Jump").unwrap_err();
    assert!(matches!(
        err,
        LowerError::Unsupported { ref kind, ref context, .. }
            if kind == "goto_statement" && context == "C.Jump"
    ));
}

#[test]
fn unknown_nested_expression_fails() {
    let program = class_c(vec![method(
        "Alloc",
        int(),
        vec![Stmt::ret(Some(Expr::binary(
            Expr::number("1"),
            BinaryOp::Add,
            Expr::other("stackalloc_array_creation"),
        )))],
    )]);

    let err = lower(&program, "C", "Alloc").unwrap_err();
    assert!(matches!(
        err,
        LowerError::Unsupported { ref kind, .. } if kind == "stackalloc_array_creation"
    ));
}

#[test]
fn hoisting_while_condition_becomes_loop_with_exit() {
    let program = class_c(vec![
        out_method("TryNext", TypeSyntax::predefined("bool")),
        Member::Method(
            MethodDecl::new("Use", void()).with_param(ParameterDecl::new("v", int())),
        ),
        method(
            "Drain",
            void(),
            vec![Stmt::while_loop(
                call("TryNext", vec![Argument::out(Expr::declaration("item"))]),
                Stmt::block(vec![Stmt::expr(call(
                    "Use",
                    vec![Argument::value(Expr::ident("item"))],
                ))]),
            )],
        ),
    ]);

    assert_eq!(
        lines(&program, "C", "Drain"),
        vec![
            "while (true) {",
            "  const out_1: { value: any } = { value: undefined };",
            "  const cond_2 = this.TryNext(out_1);",
            "  const item = out_1.value;",
            "  if (!(cond_2)) {",
            "    break;",
            "  }",
            "  this.Use(item);",
            "}",
        ]
    );
}

#[test]
fn plain_while_keeps_its_header() {
    let program = class_c(vec![
        field(&["private"], int(), "Count"),
        method(
            "Spin",
            void(),
            vec![Stmt::while_loop(
                Expr::binary(Expr::ident("Count"), BinaryOp::Gt, Expr::number("0")),
                Stmt::expr(Expr::PostfixUnary {
                    id: NodeId::NONE,
                    op: retarget_syntax::UnaryOp::Decrement,
                    operand: Box::new(Expr::ident("Count")),
                }),
            )],
        ),
    ]);

    assert_eq!(
        lines(&program, "C", "Spin"),
        vec!["while (this.Count > 0) {", "  this.Count--;", "}"]
    );
}

#[test]
fn using_becomes_try_finally_dispose() {
    let program = class_c(vec![
        Member::Method(MethodDecl::new("Open", TypeSyntax::named("Resource"))),
        method(
            "Run",
            void(),
            vec![Stmt::Using {
                id: NodeId::NONE,
                declaration: Some(VariableDeclaration {
                    ty: Some(TypeSyntax::named("var")),
                    declarators: vec![Declarator::new("r", Some(call("Open", vec![])))],
                }),
                target: None,
                body: Box::new(Stmt::block(vec![Stmt::expr(Expr::call(
                    Expr::member(Expr::ident("r"), "Read"),
                    vec![],
                ))])),
            }],
        ),
    ]);

    assert_eq!(
        lines(&program, "C", "Run"),
        vec![
            "{",
            "  const r = this.Open();",
            "  try {",
            "    r.Read();",
            "  } finally {",
            "    r.Dispose();",
            "  }",
            "}",
        ]
    );
}

#[test]
fn bare_rethrow_uses_catch_binding() {
    let program = class_c(vec![
        Member::Method(MethodDecl::new("Risky", void())),
        method(
            "Guard",
            void(),
            vec![Stmt::Try {
                id: NodeId::NONE,
                block: vec![Stmt::expr(call("Risky", vec![]))],
                catches: vec![CatchClause {
                    ty: Some(TypeSyntax::named("Exception")),
                    name: None,
                    block: vec![Stmt::Throw {
                        id: NodeId::NONE,
                        value: None,
                    }],
                }],
                finally: None,
            }],
        ),
    ]);

    assert_eq!(
        lines(&program, "C", "Guard"),
        vec![
            "try {",
            "  this.Risky();",
            "} catch (e) {",
            "  throw e;",
            "}",
        ]
    );
}

#[test]
fn else_if_chain_stays_flat() {
    let program = class_c(vec![Member::Method(
        MethodDecl::new("Pick", int())
            .with_param(ParameterDecl::new("a", TypeSyntax::predefined("bool")))
            .with_param(ParameterDecl::new("b", TypeSyntax::predefined("bool")))
            .with_body(vec![Stmt::if_stmt(
                Expr::ident("a"),
                Stmt::block(vec![Stmt::ret(Some(Expr::number("1")))]),
                Some(Stmt::if_stmt(
                    Expr::ident("b"),
                    Stmt::block(vec![Stmt::ret(Some(Expr::number("2")))]),
                    Some(Stmt::block(vec![Stmt::ret(Some(Expr::number("3")))])),
                )),
            )]),
    )]);

    assert_eq!(
        lines(&program, "C", "Pick"),
        vec![
            "if (a) {",
            "  return 1;",
            "} else if (b) {",
            "  return 2;",
            "} else {",
            "  return 3;",
            "}",
        ]
    );
}

#[test]
fn creation_uses_renamed_constructor_and_records_reference() {
    let mut point = TypeDecl::class("Point");
    point.members = vec![
        Member::Constructor(ConstructorDecl::new("Point")),
        Member::Constructor(
            ConstructorDecl::new("Point")
                .with_param(ParameterDecl::new("x", int()))
                .with_param(ParameterDecl::new("y", int())),
        ),
    ];
    let mut shape = TypeDecl::class("Shape");
    shape.members = vec![method(
        "Origin",
        TypeSyntax::named("Point"),
        vec![Stmt::ret(Some(Expr::new_object(
            TypeSyntax::named("Point"),
            vec![
                Argument::value(Expr::number("1")),
                Argument::value(Expr::number("2")),
            ],
        )))],
    )];
    let program = program_of(
        vec![Member::Type(point), Member::Type(shape)],
        Annotations::new(),
    );

    let body = lower(&program, "Shape", "Origin").unwrap();
    assert_eq!(body.lines, vec!["return new Point().New2(1, 2);"]);
    assert_eq!(body.referenced_classes, vec!["Point"]);
}

#[test]
fn base_initializer_calls_renamed_base_constructor() {
    let mut base = TypeDecl::class("Base");
    base.members = vec![
        Member::Constructor(ConstructorDecl::new("Base")),
        Member::Constructor(ConstructorDecl::new("Base").with_param(ParameterDecl::new("n", int()))),
    ];
    let mut derived = TypeDecl::class("Derived").with_base(TypeSyntax::named("Base"));
    derived.members = vec![Member::Constructor(ConstructorDecl {
        initializer: Some(ConstructorInitializer {
            target: InitializerTarget::Base,
            args: vec![Argument::value(Expr::number("5"))],
        }),
        ..ConstructorDecl::new("Derived")
    })];
    let program = program_of(
        vec![Member::Type(base), Member::Type(derived)],
        Annotations::new(),
    );

    let known = TYPESCRIPT_WRITER.known_classes();
    let engine = LoweringEngine::new(&program, TYPESCRIPT_WRITER.renderer(), &known);
    let id = program.find_class("Derived").unwrap();
    let (index, _) = program.class(id).constructors().next().unwrap();
    let body = engine.lower_function(id, index).unwrap();
    assert_eq!(body.lines, vec!["super.New2(5);"]);
}

#[test]
fn lowering_restores_scope_depth() {
    let program = class_c(vec![
        field(&["public"], int(), "Count"),
        method("Noop", void(), vec![]),
    ]);
    let known = TYPESCRIPT_WRITER.known_classes();
    let engine = LoweringEngine::new(&program, TYPESCRIPT_WRITER.renderer(), &known);
    let id = program.find_class("C").unwrap();
    let index = program.class(id).function("Noop", None).unwrap();
    let mut ctx = engine.function_context(id, index).unwrap();
    let depth = ctx.scope.depth();

    let expr = Expr::call(
        Expr::member(Expr::member(Expr::this(), "Count"), "ToString"),
        vec![],
    );
    let lowered = engine.lower_expression(&mut ctx, &expr).unwrap();
    assert_eq!(lowered.code, "this.Count.ToString()");
    assert_eq!(ctx.scope.depth(), depth);
}

#[test]
fn foreach_iterable_is_bound_before_its_write_back() {
    let program = class_c(vec![
        out_method("Items", TypeSyntax::named("IEnumerable")),
        method(
            "Run",
            void(),
            vec![
                Stmt::local(Some(int()), "x", Some(Expr::number("1"))),
                Stmt::ForEach {
                    id: NodeId::NONE,
                    ty: Some(TypeSyntax::named("var")),
                    name: "item".into(),
                    iterable: call("Items", vec![Argument::out(Expr::ident("x"))]),
                    body: Box::new(Stmt::block(vec![])),
                },
            ],
        ),
    ]);

    assert_eq!(
        lines(&program, "C", "Run"),
        vec![
            "let x: number = 1;",
            "const out_1: { value: any } = { value: undefined };",
            "const iter_2 = this.Items(out_1);",
            "x = out_1.value;",
            "for (const item of iter_2) {",
            "}",
        ]
    );
}

#[test]
fn lock_evaluates_its_target_once() {
    let lock = |target: Expr| Stmt::Lock {
        id: NodeId::NONE,
        target,
        body: Box::new(Stmt::block(vec![Stmt::expr(call("Work", vec![]))])),
    };
    let program = class_c(vec![
        Member::Method(MethodDecl::new("Acquire", TypeSyntax::predefined("object"))),
        Member::Method(MethodDecl::new("Work", void())),
        method(
            "Run",
            void(),
            vec![lock(call("Acquire", vec![])), lock(Expr::this())],
        ),
    ]);

    assert_eq!(
        lines(&program, "C", "Run"),
        vec![
            "this.Acquire();",
            "{",
            "  this.Work();",
            "}",
            "{",
            "  this.Work();",
            "}",
        ]
    );
}

#[test]
fn hoisting_switch_subject_is_bound_to_cond() {
    let program = class_c(vec![
        out_method("Next", int()),
        Member::Method(MethodDecl::new("Stop", void())),
        method(
            "Step",
            void(),
            vec![
                Stmt::local(Some(int()), "x", Some(Expr::number("0"))),
                Stmt::Switch {
                    id: NodeId::NONE,
                    subject: call("Next", vec![Argument::out(Expr::ident("x"))]),
                    sections: vec![
                        SwitchSection {
                            labels: vec![SwitchLabel::Case {
                                value: Expr::number("1"),
                            }],
                            statements: vec![
                                Stmt::expr(call("Stop", vec![])),
                                Stmt::Break { id: NodeId::NONE },
                            ],
                        },
                        SwitchSection {
                            labels: vec![SwitchLabel::Default],
                            statements: vec![Stmt::Break { id: NodeId::NONE }],
                        },
                    ],
                },
            ],
        ),
    ]);

    assert_eq!(
        lines(&program, "C", "Step"),
        vec![
            "let x: number = 0;",
            "const out_1: { value: any } = { value: undefined };",
            "const cond_2 = this.Next(out_1);",
            "x = out_1.value;",
            "switch (cond_2) {",
            "  case 1:",
            "    this.Stop();",
            "    break;",
            "  default:",
            "    break;",
            "}",
        ]
    );
}

#[test]
fn hoisting_do_condition_still_runs_after_continue() {
    let program = class_c(vec![
        out_method("TryNext", TypeSyntax::predefined("bool")),
        method(
            "Drain",
            void(),
            vec![Stmt::Do {
                id: NodeId::NONE,
                body: Box::new(Stmt::block(vec![Stmt::Continue { id: NodeId::NONE }])),
                condition: call("TryNext", vec![Argument::out(Expr::declaration("item"))]),
            }],
        ),
    ]);

    assert_eq!(
        lines(&program, "C", "Drain"),
        vec![
            "let first_2 = true;",
            "while (true) {",
            "  if (!first_2) {",
            "    const out_1: { value: any } = { value: undefined };",
            "    const cond_3 = this.TryNext(out_1);",
            "    const item = out_1.value;",
            "    if (!(cond_3)) {",
            "      break;",
            "    }",
            "  }",
            "  first_2 = false;",
            "  continue;",
            "}",
        ]
    );
}

#[test]
fn plain_do_keeps_its_footer() {
    let program = class_c(vec![Member::Method(
        MethodDecl::new("Spin", void())
            .with_param(ParameterDecl::new("n", int()))
            .with_body(vec![Stmt::Do {
                id: NodeId::NONE,
                body: Box::new(Stmt::block(vec![Stmt::Continue { id: NodeId::NONE }])),
                condition: Expr::binary(Expr::ident("n"), BinaryOp::Gt, Expr::number("0")),
            }]),
    )]);

    assert_eq!(
        lines(&program, "C", "Spin"),
        vec!["do {", "  continue;", "} while (n > 0);"]
    );
}

#[test]
fn return_and_throw_values_bind_through_ret() {
    let program = class_c(vec![
        out_method("Parse", int()),
        out_method("Make", TypeSyntax::named("Exception")),
        method(
            "Read",
            int(),
            vec![
                Stmt::local(Some(int()), "x", Some(Expr::number("0"))),
                Stmt::ret(Some(call("Parse", vec![Argument::out(Expr::ident("x"))]))),
            ],
        ),
        method(
            "Raise",
            void(),
            vec![
                Stmt::local(Some(int()), "code", Some(Expr::number("0"))),
                Stmt::Throw {
                    id: NodeId::NONE,
                    value: Some(call("Make", vec![Argument::out(Expr::ident("code"))])),
                },
            ],
        ),
    ]);

    assert_eq!(
        lines(&program, "C", "Read"),
        vec![
            "let x: number = 0;",
            "const out_1: { value: any } = { value: undefined };",
            "const ret_2 = this.Parse(out_1);",
            "x = out_1.value;",
            "return ret_2;",
        ]
    );
    assert_eq!(
        lines(&program, "C", "Raise"),
        vec![
            "let code: number = 0;",
            "const out_1: { value: any } = { value: undefined };",
            "const ret_2 = this.Make(out_1);",
            "code = out_1.value;",
            "throw ret_2;",
        ]
    );
}

#[test]
fn sibling_block_locals_keep_their_own_mutability() {
    let program = class_c(vec![method(
        "Run",
        void(),
        vec![
            Stmt::block(vec![
                Stmt::local(Some(int()), "x", Some(Expr::number("1"))),
                Stmt::expr(Expr::assign(Expr::ident("x"), Expr::number("2"))),
            ]),
            Stmt::block(vec![Stmt::local(Some(int()), "x", Some(Expr::number("3")))]),
        ],
    )]);

    assert_eq!(
        lines(&program, "C", "Run"),
        vec![
            "{",
            "  let x: number = 1;",
            "  x = 2;",
            "}",
            "{",
            "  const x: number = 3;",
            "}",
        ]
    );
}

#[test]
fn short_circuit_out_declaration_stays_in_statement_scope() {
    let program = class_c(vec![
        out_method("TryGet", TypeSyntax::predefined("bool")),
        Member::Method(
            MethodDecl::new("Use", void()).with_param(ParameterDecl::new("v", int())),
        ),
        Member::Method(
            MethodDecl::new("Run", void())
                .with_param(ParameterDecl::new("ready", TypeSyntax::predefined("bool")))
                .with_body(vec![Stmt::if_stmt(
                    Expr::binary(
                        Expr::ident("ready"),
                        BinaryOp::And,
                        call("TryGet", vec![Argument::out(Expr::declaration("v"))]),
                    ),
                    Stmt::block(vec![Stmt::expr(call(
                        "Use",
                        vec![Argument::value(Expr::ident("v"))],
                    ))]),
                    None,
                )]),
        ),
    ]);

    assert_eq!(
        lines(&program, "C", "Run"),
        vec![
            "const out_1: { value: any } = { value: undefined };",
            "const cond_2 = ready && this.TryGet(out_1);",
            "const v = out_1.value;",
            "if (cond_2) {",
            "  this.Use(v);",
            "}",
        ]
    );
}
