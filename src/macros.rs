//! ABOUTME: Compile-time macro pass — collects `macro` literal definitions out
//! of the program, then expands every remaining call to one of them (C7)

use crate::ast::{Expression, LetStatement, Node, Program, Statement};
use crate::env::Environment;
use crate::eval::eval_program;
use crate::object::Object;
use std::rc::Rc;

/// Removes every top-level `let name = macro(...) { ... };` statement from
/// `program`, binding each macro's definition into `macro_env`. Ordinary
/// evaluation never sees a macro definition or its name.
pub fn define_macros(program: &mut Program, macro_env: &Rc<Environment>) {
    let mut remaining = Vec::with_capacity(program.statements.len());

    for statement in program.statements.drain(..) {
        if let Some((name, parameters, body)) = as_macro_definition(statement.clone()) {
            let definition = Object::Macro {
                parameters,
                body,
                env: macro_env.clone(),
            };
            macro_env.set(name, definition);
        } else {
            remaining.push(statement);
        }
    }

    program.statements = remaining;
}

fn as_macro_definition(statement: Statement) -> Option<(String, Vec<crate::ast::Identifier>, crate::ast::BlockStatement)> {
    match statement {
        Statement::Let(LetStatement {
            name,
            value: Expression::MacroLiteral(lit),
            ..
        }) => Some((name.value, lit.parameters, lit.body)),
        _ => None,
    }
}

/// Rewrites every call to a known macro with the AST its body quotes,
/// recursively, bottom-up. Non-macro calls are left untouched.
pub fn expand_macros(program: Program, macro_env: &Rc<Environment>) -> Program {
    let mut rewrite = |node: Node| -> Node {
        let Node::Expression(Expression::Call(call)) = &node else {
            return node;
        };
        let Expression::Identifier(ident) = call.function.as_ref() else {
            return node;
        };
        let Some(Object::Macro {
            parameters,
            body,
            env,
        }) = macro_env.get(&ident.value)
        else {
            return node;
        };

        let eval_env = Environment::enclosed(env);
        for (param, arg) in parameters.iter().zip(call.arguments.iter()) {
            eval_env.set(param.value.clone(), Object::Quote(arg.clone()));
        }

        match eval_program(&body.statements, eval_env) {
            Object::Quote(expr) => Node::Expression(expr),
            other => panic!("macro expansion must produce a Quote, got {other:?}"),
        }
    };

    match crate::modify::modify(Node::Program(program), &mut rewrite) {
        Node::Program(program) => program,
        _ => unreachable!("modify preserves the Program kind of its input"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn parse(input: &str) -> Program {
        let (program, errors) = Parser::new(Lexer::new(input)).parse_program();
        assert!(errors.is_empty(), "parser errors: {errors:?}");
        program
    }

    #[test]
    fn define_macros_removes_the_definition_and_binds_it() {
        let mut program = parse(
            r#"
            let number = 1;
            let function = fn(x, y) { x + y };
            let myMacro = macro(x, y) { x + y; };
            "#,
        );
        let env = Environment::new();
        define_macros(&mut program, &env);

        assert_eq!(program.statements.len(), 2);
        assert!(env.get("number").is_none());
        assert!(env.get("function").is_none());
        assert!(matches!(env.get("myMacro"), Some(Object::Macro { .. })));
    }

    #[test]
    fn expand_macros_splices_quoted_unevaluated_arguments() {
        let mut program = parse(
            r#"
            let infixExpression = macro() { quote(1 + 2); };
            infixExpression();
            "#,
        );
        let env = Environment::new();
        define_macros(&mut program, &env);
        let expanded = expand_macros(program, &env);

        assert_eq!(expanded.statements.len(), 1);
        assert_eq!(expanded.statements[0].to_string(), "(1 + 2)");
    }

    #[test]
    fn expand_macros_can_reorder_its_arguments_unevaluated() {
        let mut program = parse(
            r#"
            let reverse = macro(a, b) { quote(unquote(b) - unquote(a)); };
            reverse(2 + 2, 10 - 5);
            "#,
        );
        let env = Environment::new();
        define_macros(&mut program, &env);
        let expanded = expand_macros(program, &env);

        assert_eq!(expanded.statements.len(), 1);
        assert_eq!(expanded.statements[0].to_string(), "(10 - 5 - (2 + 2))");
    }
}
