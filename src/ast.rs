// ABOUTME: Abstract syntax tree types produced by the parser

/// A top-level program: a sequence of statements executed in order.
pub type Program = Vec<Statement>;

#[derive(Debug, Clone, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),
    String(String),
    /// `c@<color>"<text>"` literal.
    ColorString { color: String, text: String },
    Array(Vec<Expression>),
    /// Property evaluation order is unspecified; preserved here as written.
    Object(Vec<(String, Expression)>),
    Function {
        parameters: Vec<String>,
        body: Vec<Statement>,
    },
    Identifier(String),
    Member {
        object: Box<Expression>,
        property: String,
    },
    Index {
        object: Box<Expression>,
        index: Box<Expression>,
    },
    Binary {
        left: Box<Expression>,
        op: BinaryOp,
        right: Box<Expression>,
    },
    /// Callee is always a bare identifier, never an arbitrary expression.
    Call {
        function: String,
        arguments: Vec<Expression>,
    },
    MethodCall {
        receiver: Box<Expression>,
        method: String,
        arguments: Vec<Expression>,
    },
    Typeof(Box<Expression>),
    /// Mixed `String` and evaluated parts, in source order.
    Interpolation(Vec<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    ExprStmt(Expression),
    /// Updates an existing binding or creates one — identical semantics to
    /// `NewVariable` at evaluation time.
    Assign { name: String, value: Expression },
    NewVariable { name: String, value: Expression },
    If {
        condition: Expression,
        then_block: Vec<Statement>,
        /// A chained `diff if` is represented as a single nested `If`
        /// statement inside this block.
        else_block: Option<Vec<Statement>>,
    },
    While {
        condition: Expression,
        body: Vec<Statement>,
    },
    FunctionDecl {
        name: String,
        parameters: Vec<String>,
        body: Vec<Statement>,
    },
    Return(Option<Expression>),
    SystemCall(Expression),
    Import(String),
    Save(String),
    Message { slot: String, value: Expression },
}
