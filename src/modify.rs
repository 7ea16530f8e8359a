//! ABOUTME: Modifier — generic bottom-up AST rewrite visitor (C6)

use crate::ast::{BlockStatement, Expression, Identifier, Node, Statement};

/// Rewrites `node` bottom-up: every compound node has its children rewritten
/// first, then `f` is applied to the (already-updated) node itself. Leaf
/// nodes and any node kind not explicitly handled below are passed to `f`
/// unmodified, with no further recursion.
pub fn modify(node: Node, f: &mut impl FnMut(Node) -> Node) -> Node {
    let node = match node {
        Node::Program(mut program) => {
            program.statements = program
                .statements
                .into_iter()
                .map(|s| into_statement(modify(s.into(), f)))
                .collect();
            Node::Program(program)
        }
        Node::Statement(Statement::Block(mut block)) => {
            block.statements = block
                .statements
                .into_iter()
                .map(|s| into_statement(modify(s.into(), f)))
                .collect();
            Node::Statement(Statement::Block(block))
        }
        Node::Statement(Statement::Expression(mut stmt)) => {
            stmt.value = into_expression(modify(stmt.value.into(), f));
            Node::Statement(Statement::Expression(stmt))
        }
        Node::Statement(Statement::Return(mut stmt)) => {
            stmt.value = into_expression(modify(stmt.value.into(), f));
            Node::Statement(Statement::Return(stmt))
        }
        Node::Statement(Statement::Let(mut stmt)) => {
            stmt.value = into_expression(modify(stmt.value.into(), f));
            Node::Statement(Statement::Let(stmt))
        }
        Node::Expression(Expression::Infix(mut expr)) => {
            expr.left = Box::new(into_expression(modify((*expr.left).into(), f)));
            expr.right = Box::new(into_expression(modify((*expr.right).into(), f)));
            Node::Expression(Expression::Infix(expr))
        }
        Node::Expression(Expression::Prefix(mut expr)) => {
            expr.right = Box::new(into_expression(modify((*expr.right).into(), f)));
            Node::Expression(Expression::Prefix(expr))
        }
        Node::Expression(Expression::Index(mut expr)) => {
            expr.left = Box::new(into_expression(modify((*expr.left).into(), f)));
            expr.index = Box::new(into_expression(modify((*expr.index).into(), f)));
            Node::Expression(Expression::Index(expr))
        }
        Node::Expression(Expression::If(mut expr)) => {
            expr.condition = Box::new(into_expression(modify((*expr.condition).into(), f)));
            expr.consequence = into_block(modify(Statement::Block(expr.consequence).into(), f));
            expr.alternative = expr
                .alternative
                .map(|alt| into_block(modify(Statement::Block(alt).into(), f)));
            Node::Expression(Expression::If(expr))
        }
        Node::Expression(Expression::FunctionLiteral(mut expr)) => {
            expr.parameters = expr
                .parameters
                .into_iter()
                .map(|p| into_identifier(modify(Expression::Identifier(p).into(), f)))
                .collect();
            expr.body = into_block(modify(Statement::Block(expr.body).into(), f));
            Node::Expression(Expression::FunctionLiteral(expr))
        }
        Node::Expression(Expression::ArrayLiteral(mut expr)) => {
            expr.elements = expr
                .elements
                .into_iter()
                .map(|e| into_expression(modify(e.into(), f)))
                .collect();
            Node::Expression(Expression::ArrayLiteral(expr))
        }
        Node::Expression(Expression::HashLiteral(mut expr)) => {
            expr.pairs = expr
                .pairs
                .into_iter()
                .map(|(k, v)| {
                    let k = into_expression(modify(k.into(), f));
                    let v = into_expression(modify(v.into(), f));
                    (k, v)
                })
                .collect();
            Node::Expression(Expression::HashLiteral(expr))
        }
        other => other,
    };

    f(node)
}

// `f` is expected to preserve each slot's kind. A mismatched return is
// implementation-defined and not exercised by any caller or test, same as
// the reference implementation's discarding type assertion.
fn into_statement(node: Node) -> Statement {
    match node {
        Node::Statement(s) => s,
        other => panic!("modify: expected Statement, got {other:?}"),
    }
}

fn into_expression(node: Node) -> Expression {
    match node {
        Node::Expression(e) => e,
        other => panic!("modify: expected Expression, got {other:?}"),
    }
}

fn into_block(node: Node) -> BlockStatement {
    match node {
        Node::Statement(Statement::Block(b)) => b,
        other => panic!("modify: expected BlockStatement, got {other:?}"),
    }
}

fn into_identifier(node: Node) -> Identifier {
    match node {
        Node::Expression(Expression::Identifier(i)) => i,
        other => panic!("modify: expected Identifier, got {other:?}"),
    }
}
