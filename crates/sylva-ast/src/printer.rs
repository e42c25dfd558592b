//! Source text printer
//!
//! Turns a tree back into JavaScript source. Layout is driven entirely by a
//! [`Formatter`]; the same tree renders as pretty, compact or expanded text.

use crate::nodes::{format_number, quote_string};
use crate::{
    BinaryExpression, BinaryOperator, BlockStatement, CallExpression, Comment, CommentKind,
    Expression, ExpressionStatement, Formatter, Identifier, IfStatement, Literal, LiteralValue,
    Node, NodeKind, Program, QuoteStyle, ReturnStatement, Statement, VariableDeclaration,
    VariableDeclarator,
};

/// Writes a node's own syntax into a [`Renderer`].
///
/// Comments are handled by the renderer, implementations only emit the
/// node itself and hand children back through [`Renderer::node`].
pub trait Render {
    fn render_to(&self, out: &mut Renderer<'_>);
}

/// Output buffer plus the state needed while printing
pub struct Renderer<'f> {
    formatter: &'f Formatter,
    out: String,
    level: usize,
    // A `//` comment is open; the next token must start a new line.
    line_comment: bool,
}

impl<'f> Renderer<'f> {
    pub fn new(formatter: &'f Formatter) -> Self {
        Self {
            formatter,
            out: String::new(),
            level: 0,
            line_comment: false,
        }
    }

    pub fn formatter(&self) -> &Formatter {
        self.formatter
    }

    /// Render `node` and its descendants
    pub fn render(mut self, node: &dyn Node) -> String {
        tracing::debug!(kind = node.kind().name(), "rendering");
        self.node(node);
        self.out
    }

    /// Render a child with its comments. Statements get their comments on
    /// separate lines, everything else keeps them inline.
    pub fn node(&mut self, node: &dyn Node) {
        let kind = node.kind();
        let statement_like = !kind.is_expression() && kind != NodeKind::VariableDeclarator;
        let comments = self.formatter.render_comments;

        if comments {
            for comment in node.leading_comments() {
                if statement_like {
                    self.comment(comment);
                    self.line_break();
                } else {
                    self.block_comment(comment);
                    self.write(" ");
                }
            }
        }

        node.render_to(self);

        if comments {
            for comment in node.trailing_comments() {
                if !self.line_comment {
                    self.write(" ");
                }
                if statement_like {
                    self.comment(comment);
                } else {
                    self.block_comment(comment);
                }
            }
        }
    }

    fn write(&mut self, text: &str) {
        if self.line_comment {
            self.line_break();
        }
        self.out.push_str(text);
    }

    fn line_break(&mut self) {
        self.line_comment = false;
        if self.formatter.new_line.is_empty() {
            return;
        }
        self.out.push_str(&self.formatter.new_line);
        for _ in 0..self.level {
            self.out.push_str(&self.formatter.indentation);
        }
    }

    fn optional_space(&mut self) {
        if self.formatter.spaces_around_operators {
            self.write(" ");
        }
    }

    fn comma(&mut self) {
        self.write(",");
        self.optional_space();
    }

    fn operator(&mut self, op: &str) {
        self.optional_space();
        self.write(op);
        self.optional_space();
    }

    fn open_round(&mut self) {
        self.write("(");
        if self.formatter.spaces_inside_round_brackets {
            self.write(" ");
        }
    }

    fn close_round(&mut self) {
        if self.formatter.spaces_inside_round_brackets {
            self.write(" ");
        }
        self.write(")");
    }

    // Inline comments would swallow the rest of the line when there is none.
    fn comment(&mut self, comment: &Comment) {
        if comment.kind == CommentKind::Inline && !self.formatter.new_line.is_empty() {
            self.write(&comment.raw_text());
            self.line_comment = true;
        } else {
            self.block_comment(comment);
        }
    }

    fn block_comment(&mut self, comment: &Comment) {
        self.write("/*");
        self.write(&comment.text.replace("*/", "* /"));
        self.write("*/");
    }

    fn before_curly(&mut self) {
        let new_line = self.formatter.new_line_before_curly_bracket || self.line_comment;
        if new_line && !self.formatter.new_line.is_empty() {
            self.line_break();
        } else {
            self.optional_space();
        }
    }

    fn statements(&mut self, body: &[Statement]) {
        for (i, statement) in body.iter().enumerate() {
            if i > 0 {
                self.line_break();
            }
            self.node(statement.as_node());
        }
    }

    fn braced(&mut self, body: &[&Statement]) {
        self.write("{");
        if !body.is_empty() {
            self.level += 1;
            for statement in body {
                self.line_break();
                self.node(statement.as_node());
            }
            self.level -= 1;
            self.line_break();
        }
        self.write("}");
    }

    /// Body of an `if` or `else`. Returns whether it ended with a brace.
    /// `force_block` wraps a bare body in braces regardless of the formatter.
    fn clause(&mut self, body: &Statement, force_block: bool) -> bool {
        match body {
            Statement::Block(_) => {
                self.before_curly();
                self.node(body.as_node());
                true
            }
            _ if force_block || self.formatter.always_require_block => {
                self.before_curly();
                self.braced(&[body]);
                true
            }
            _ if self.formatter.new_line.is_empty() => {
                self.write(" ");
                self.node(body.as_node());
                false
            }
            _ => {
                self.level += 1;
                self.line_break();
                self.node(body.as_node());
                self.level -= 1;
                false
            }
        }
    }

    fn operand(&mut self, operand: &Expression, parenthesize: bool) {
        if parenthesize {
            self.write("(");
            self.node(operand.as_node());
            self.write(")");
        } else {
            self.node(operand.as_node());
        }
    }
}

// ===== Statements =====

impl Render for Program {
    fn render_to(&self, out: &mut Renderer<'_>) {
        out.statements(&self.body);
    }
}

impl Render for ExpressionStatement {
    fn render_to(&self, out: &mut Renderer<'_>) {
        out.node(self.expression.as_node());
        out.write(";");
    }
}

impl Render for VariableDeclaration {
    fn render_to(&self, out: &mut Renderer<'_>) {
        out.write(self.declaration_kind.as_str());
        out.write(" ");
        for (i, declarator) in self.declarations.iter().enumerate() {
            if i > 0 {
                out.comma();
            }
            out.node(declarator);
        }
        out.write(";");
    }
}

impl Render for VariableDeclarator {
    fn render_to(&self, out: &mut Renderer<'_>) {
        out.node(&self.id);
        if let Some(init) = &self.init {
            out.operator("=");
            out.node(init.as_node());
        }
    }
}

impl Render for BlockStatement {
    fn render_to(&self, out: &mut Renderer<'_>) {
        let body: Vec<&Statement> = self.body.iter().collect();
        out.braced(&body);
    }
}

impl Render for IfStatement {
    fn render_to(&self, out: &mut Renderer<'_>) {
        out.write("if");
        out.optional_space();
        out.open_round();
        out.node(self.test.as_node());
        out.close_round();
        // A bare `if` without `else` would capture our `else` when parsed back.
        let dangling = self.alternate.is_some() && ends_with_open_if(&self.consequent);
        let braced = out.clause(&self.consequent, dangling);

        let Some(alternate) = &self.alternate else {
            return;
        };
        if braced {
            out.before_curly();
        } else {
            out.line_break();
        }
        out.write("else");
        match alternate {
            Statement::If(_) => {
                out.write(" ");
                out.node(alternate.as_node());
            }
            _ => {
                out.clause(alternate, false);
            }
        }
    }
}

fn ends_with_open_if(statement: &Statement) -> bool {
    match statement {
        Statement::If(node) => match &node.alternate {
            Some(alternate) => ends_with_open_if(alternate),
            None => true,
        },
        _ => false,
    }
}

impl Render for ReturnStatement {
    fn render_to(&self, out: &mut Renderer<'_>) {
        out.write("return");
        if let Some(argument) = &self.argument {
            out.write(" ");
            out.node(argument.as_node());
        }
        out.write(";");
    }
}

// ===== Expressions =====

impl Render for Identifier {
    fn render_to(&self, out: &mut Renderer<'_>) {
        out.write(&self.name);
    }
}

impl Render for Literal {
    fn render_to(&self, out: &mut Renderer<'_>) {
        let text = match (&self.value, out.formatter.quote) {
            (_, QuoteStyle::Preserve) if !self.raw.is_empty() => self.raw.clone(),
            (LiteralValue::String(s), quote) => quote_string(s, quote.delimiter().unwrap_or('"')),
            (LiteralValue::Number(n), _) => format_number(*n),
            (value, _) => value.default_raw(),
        };
        out.write(&text);
    }
}

/// Binding power of an operand; atoms never need parentheses
fn operand_precedence(expression: &Expression) -> u8 {
    match expression {
        Expression::Binary(binary) => binary.operator.precedence(),
        _ => u8::MAX,
    }
}

fn is_negative_number(expression: &Expression) -> bool {
    match expression {
        Expression::Literal(literal) => match literal.value {
            LiteralValue::Number(n) => n.is_sign_negative(),
            _ => false,
        },
        _ => false,
    }
}

impl Render for BinaryExpression {
    fn render_to(&self, out: &mut Renderer<'_>) {
        let op = self.operator;
        let precedence = op.precedence();
        let right_assoc = op.is_right_associative();

        let left = operand_precedence(&self.left);
        // `-1 ** 2` is a syntax error
        let left_parens = left < precedence
            || (left == precedence && right_assoc)
            || (op == BinaryOperator::Exp && is_negative_number(&self.left));
        out.operand(&self.left, left_parens);

        let spaced = out.formatter.spaces_around_operators || op.is_keyword();
        if spaced {
            out.write(" ");
        }
        out.write(op.as_str());
        if spaced {
            out.write(" ");
        }

        let right = operand_precedence(&self.right);
        let mark = out.out.len();
        out.operand(&self.right, right < precedence || (right == precedence && !right_assoc));

        // Keep `a - -1` from collapsing into `a--1`.
        if !spaced {
            let last = op.as_str().chars().last();
            let next = out.out[mark..].chars().next();
            if last.is_some() && last == next && matches!(last, Some('+') | Some('-')) {
                out.out.insert(mark, ' ');
            }
        }
    }
}

impl Render for CallExpression {
    fn render_to(&self, out: &mut Renderer<'_>) {
        // `-1()` would call `1` and negate the result
        let callee_parens =
            matches!(self.callee, Expression::Binary(_)) || is_negative_number(&self.callee);
        out.operand(&self.callee, callee_parens);
        if self.arguments.is_empty() {
            out.write("()");
            return;
        }
        out.open_round();
        for (i, argument) in self.arguments.iter().enumerate() {
            if i > 0 {
                out.comma();
            }
            out.node(argument.as_node());
        }
        out.close_round();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Comment, DeclarationKind};

    fn ident(name: &str) -> Expression {
        Identifier::new(name).into()
    }

    fn call(name: &str, args: Vec<Expression>) -> Expression {
        CallExpression::new(ident(name), args).into()
    }

    fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Expression {
        BinaryExpression::new(op, left, right).into()
    }

    fn stmt(expression: Expression) -> Statement {
        ExpressionStatement::new(expression).into()
    }

    fn if_else() -> IfStatement {
        IfStatement::new(
            ident("a"),
            stmt(call("b", vec![])),
            Some(stmt(call("c", vec![]))),
        )
    }

    #[test]
    fn if_else_in_each_preset() {
        let node = if_else();
        assert_eq!(
            node.render(&Formatter::pretty_print()),
            "if (a) {\n    b();\n} else {\n    c();\n}"
        );
        assert_eq!(node.render(&Formatter::compact()), "if(a) b();else c();");
        assert_eq!(
            node.render(&Formatter::expanded()),
            "if ( a )\n{\n    b();\n}\nelse\n{\n    c();\n}"
        );
    }

    #[test]
    fn unbraced_bodies_are_indented() {
        let formatter = Formatter {
            always_require_block: false,
            ..Formatter::pretty_print()
        };
        assert_eq!(
            if_else().render(&formatter),
            "if (a)\n    b();\nelse\n    c();"
        );
    }

    #[test]
    fn else_if_chains_stay_flat() {
        let inner = IfStatement::new(ident("x"), stmt(call("y", vec![])), None);
        let node = IfStatement::new(
            ident("a"),
            BlockStatement::new(vec![]).into(),
            Some(inner.into()),
        );
        assert_eq!(
            node.render(&Formatter::pretty_print()),
            "if (a) {} else if (x) {\n    y();\n}"
        );
    }

    #[test]
    fn else_stays_with_outer_if() {
        let inner = IfStatement::new(ident("b"), stmt(call("x", vec![])), None);
        let node = IfStatement::new(ident("a"), inner.into(), Some(stmt(call("y", vec![]))));
        assert_eq!(node.render(&Formatter::compact()), "if(a){if(b) x();}else y();");

        let unbraced = Formatter {
            always_require_block: false,
            ..Formatter::pretty_print()
        };
        assert_eq!(
            node.render(&unbraced),
            "if (a) {\n    if (b)\n        x();\n} else\n    y();"
        );

        // closed inner chains need no braces
        let closed = IfStatement::new(
            ident("a"),
            IfStatement::new(ident("b"), stmt(call("x", vec![])), Some(stmt(call("z", vec![])))).into(),
            Some(stmt(call("y", vec![]))),
        );
        assert_eq!(closed.render(&Formatter::compact()), "if(a) if(b) x();else z();else y();");
    }

    #[test]
    fn line_comment_before_else_ends_the_line() {
        let mut block = BlockStatement::new(vec![stmt(call("x", vec![]))]);
        block.set_trailing_comments(vec![Comment::inline(" done")]);
        let node = IfStatement::new(ident("a"), block.into(), Some(stmt(call("y", vec![]))));
        assert_eq!(
            node.render(&Formatter::pretty_print()),
            "if (a) {\n    x();\n} // done\nelse {\n    y();\n}"
        );
    }

    #[test]
    fn consecutive_trailing_line_comments() {
        let mut statement = ExpressionStatement::new(call("a", vec![]));
        statement.set_trailing_comments(vec![Comment::inline(" one"), Comment::inline(" two")]);
        let program = Program::new(vec![statement.into(), stmt(call("b", vec![]))]);
        assert_eq!(
            program.render(&Formatter::pretty_print()),
            "a(); // one\n// two\nb();"
        );
    }

    #[test]
    fn block_comment_text_cannot_close_early() {
        let mut id = Identifier::new("x");
        id.set_leading_comments(vec![Comment::inline(" a */ b")]);
        let node = ReturnStatement::new(Some(id.into()));
        assert_eq!(node.render(&Formatter::pretty_print()), "return /* a * / b*/ x;");
    }

    #[test]
    fn operands_parenthesized_by_precedence() {
        let sum = binary(BinaryOperator::Add, ident("a"), ident("b"));
        let product = BinaryExpression::new(BinaryOperator::Mul, sum.clone(), ident("c"));
        assert_eq!(product.render(&Formatter::pretty_print()), "(a + b) * c");

        let nested = BinaryExpression::new(
            BinaryOperator::Sub,
            ident("a"),
            binary(BinaryOperator::Sub, ident("b"), ident("c")),
        );
        assert_eq!(nested.render(&Formatter::compact()), "a-(b-c)");

        let chained = BinaryExpression::new(BinaryOperator::Add, sum, ident("c"));
        assert_eq!(chained.render(&Formatter::compact()), "a+b+c");

        let power = BinaryExpression::new(
            BinaryOperator::Exp,
            ident("a"),
            binary(BinaryOperator::Exp, ident("b"), ident("c")),
        );
        assert_eq!(power.render(&Formatter::compact()), "a**b**c");
    }

    #[test]
    fn adjacent_signs_are_separated() {
        let node = BinaryExpression::new(BinaryOperator::Sub, ident("a"), Literal::number(-1.0).into());
        assert_eq!(node.render(&Formatter::compact()), "a- -1");
        assert_eq!(node.render(&Formatter::pretty_print()), "a - -1");

        let power = BinaryExpression::new(BinaryOperator::Exp, Literal::number(-2.0).into(), ident("n"));
        assert_eq!(power.render(&Formatter::compact()), "(-2)**n");

        let callee = CallExpression::new(Literal::number(-1.0).into(), vec![]);
        assert_eq!(callee.render(&Formatter::compact()), "(-1)()");
    }

    #[test]
    fn keyword_operators_always_spaced() {
        let node = BinaryExpression::new(BinaryOperator::In, Literal::string("k").into(), ident("o"));
        assert_eq!(node.render(&Formatter::compact()), "\"k\" in o");
    }

    #[test]
    fn string_quoting_follows_formatter() {
        let literal = Literal::with_raw(LiteralValue::String("it's".into()), "'it\\'s'");
        assert_eq!(literal.render(&Formatter::pretty_print()), "\"it's\"");
        let single = Formatter {
            quote: QuoteStyle::Single,
            ..Formatter::pretty_print()
        };
        assert_eq!(literal.render(&single), "'it\\'s'");
        let preserve = Formatter {
            quote: QuoteStyle::Preserve,
            ..Formatter::pretty_print()
        };
        let hex = Literal::with_raw(LiteralValue::Number(16.0), "0x10");
        assert_eq!(hex.render(&preserve), "0x10");
        assert_eq!(hex.render(&Formatter::pretty_print()), "16");
    }

    #[test]
    fn declarations_and_calls() {
        let node = VariableDeclaration::new(
            DeclarationKind::Let,
            vec![
                VariableDeclarator::new(Identifier::new("a"), Some(Literal::number(1.0).into())),
                VariableDeclarator::new(Identifier::new("b"), None),
            ],
        );
        assert_eq!(node.render(&Formatter::pretty_print()), "let a = 1, b;");
        assert_eq!(node.render(&Formatter::compact()), "let a=1,b;");

        let args = CallExpression::new(ident("f"), vec![ident("x"), ident("y")]);
        assert_eq!(args.render(&Formatter::expanded()), "f( x, y )");
        assert_eq!(args.render(&Formatter::compact()), "f(x,y)");
    }

    #[test]
    fn nested_blocks_indent() {
        let inner = BlockStatement::new(vec![ReturnStatement::new(Some(ident("x"))).into()]);
        let program = Program::new(vec![stmt(call("a", vec![])), inner.into()]);
        assert_eq!(
            program.render(&Formatter::pretty_print()),
            "a();\n{\n    return x;\n}"
        );
        assert_eq!(program.render(&Formatter::compact()), "a();{return x;}");
    }

    #[test]
    fn statement_comments_on_their_own_line() {
        let mut statement = ExpressionStatement::new(call("a", vec![]));
        statement
            .set_leading_comments(vec![Comment::inline(" note")])
            .set_trailing_comments(vec![Comment::multiline(" end ")]);
        let program = Program::new(vec![statement.into()]);
        assert_eq!(
            program.render(&Formatter::pretty_print()),
            "// note\na(); /* end */"
        );
        assert_eq!(program.render(&Formatter::compact()), "a();");

        let one_line = Formatter {
            render_comments: true,
            ..Formatter::compact()
        };
        assert_eq!(program.render(&one_line), "/* note*/a(); /* end */");
    }

    #[test]
    fn expression_comments_stay_inline() {
        let mut id = Identifier::new("x");
        id.set_leading_comments(vec![Comment::inline(" why")]);
        let node = ReturnStatement::new(Some(id.into()));
        assert_eq!(node.render(&Formatter::pretty_print()), "return /* why*/ x;");
    }
}
