use serde::Serialize;

use crate::lexer::LiteralValue;
use crate::level::SyntaxLevel;
use crate::span::Spanned;

pub type Ident = Spanned<String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Program {
    pub statements: Vec<Spanned<Stmt>>,
}

// ---------------------------------------------------------------------------
// Modifiers and generics

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Visibility {
    Public,
    Private,
    Protected,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Modifier {
    Static,
    Const,
    Readonly,
    Abstract,
    Virtual,
    Override,
    Sealed,
    Async,
    Extern,
    Unsafe,
    Mut,
    ThreadLocal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Modifiers {
    pub visibility: Option<Visibility>,
    pub flags: Vec<Modifier>,
}

impl Modifiers {
    pub fn has(&self, modifier: Modifier) -> bool {
        self.flags.contains(&modifier)
    }

    pub fn is_empty(&self) -> bool {
        self.visibility.is_none() && self.flags.is_empty()
    }

    pub fn insert(&mut self, modifier: Modifier) {
        if !self.has(modifier) {
            self.flags.push(modifier);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Variance {
    Covariant,
    Contravariant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeParam {
    pub name: Ident,
    pub variance: Option<Variance>,
    pub bounds: Vec<Spanned<TypeExpr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeExpr {
    /// `int`, `System.String`, `List<T>`; path segments are joined with `.`.
    Named { name: String, args: Vec<Spanned<TypeExpr>> },
    Array(Box<Spanned<TypeExpr>>),
    Nullable(Box<Spanned<TypeExpr>>),
    Pointer { inner: Box<Spanned<TypeExpr>>, mutable: bool },
    Reference { inner: Box<Spanned<TypeExpr>>, mutable: bool },
    Tuple(Vec<Spanned<TypeExpr>>),
    Function { params: Vec<Spanned<TypeExpr>>, return_type: Option<Box<Spanned<TypeExpr>>> },
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named { name: name.into(), args: Vec::new() }
    }
}

// ---------------------------------------------------------------------------
// Declarations

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
    Union,
}

impl TypeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Struct => "struct",
            TypeKind::Union => "union",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamespaceDecl {
    pub name: Ident,
    /// `None` for a file-scoped `namespace A.B;`.
    pub body: Option<Vec<Spanned<Stmt>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleDecl {
    pub name: Ident,
    pub body: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub name: Ident,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParam>,
    pub bases: Vec<Spanned<TypeExpr>>,
    pub members: Vec<Spanned<Stmt>>,
    pub level: SyntaxLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumVariant {
    pub name: Ident,
    pub value: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumDecl {
    pub name: Ident,
    pub modifiers: Modifiers,
    pub underlying: Option<Spanned<TypeExpr>>,
    pub variants: Vec<EnumVariant>,
    pub level: SyntaxLevel,
}

/// `<symbol> means <function> [for Type]` inside a domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorBinding {
    pub symbol: Spanned<String>,
    pub function: Ident,
    pub operand: Option<Spanned<TypeExpr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainDecl {
    pub name: Ident,
    pub bindings: Vec<OperatorBinding>,
    pub members: Vec<Spanned<Stmt>>,
    pub level: SyntaxLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitDecl {
    pub name: Ident,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParam>,
    pub supertraits: Vec<Spanned<TypeExpr>>,
    pub members: Vec<Spanned<FunctionDecl>>,
    pub level: SyntaxLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImplementDecl {
    pub type_params: Vec<TypeParam>,
    pub trait_ref: Option<Spanned<TypeExpr>>,
    pub target: Spanned<TypeExpr>,
    pub members: Vec<Spanned<Stmt>>,
    pub level: SyntaxLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: Ident,
    pub ty: Option<Spanned<TypeExpr>>,
    pub default: Option<Spanned<Expr>>,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FunctionBody {
    Block(Spanned<Block>),
    Expr(Spanned<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDecl {
    pub name: Ident,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub return_type: Option<Spanned<TypeExpr>>,
    /// `None` for signatures (trait, interface and extern members).
    pub body: Option<FunctionBody>,
    pub is_constructor: bool,
    pub level: SyntaxLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDecl {
    pub modifiers: Modifiers,
    pub names: Vec<Ident>,
    pub ty: Option<Spanned<TypeExpr>>,
    pub value: Option<Spanned<Expr>>,
    pub is_const: bool,
    pub level: SyntaxLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroParam {
    pub name: Ident,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroDecl {
    pub name: Ident,
    pub params: Vec<MacroParam>,
    pub body: Spanned<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestructorDecl {
    /// Present for the `~Name()` form.
    pub name: Option<Ident>,
    pub modifiers: Modifiers,
    pub body: Spanned<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternBlock {
    pub abi: Option<String>,
    pub functions: Vec<Spanned<FunctionDecl>>,
}

// ---------------------------------------------------------------------------
// Statements

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchCase {
    /// Empty for `default:`.
    pub labels: Vec<Spanned<Expr>>,
    pub is_default: bool,
    pub body: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ArmBody {
    Expr(Spanned<Expr>),
    Block(Spanned<Block>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchArm {
    pub pattern: Spanned<Pattern>,
    pub guard: Option<Spanned<Expr>>,
    pub body: ArmBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatchClause {
    pub ty: Option<Spanned<TypeExpr>>,
    pub name: Option<Ident>,
    pub body: Spanned<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    Namespace(NamespaceDecl),
    Module(ModuleDecl),
    Type(TypeDecl),
    Enum(EnumDecl),
    Domain(DomainDecl),
    Trait(TraitDecl),
    Implement(ImplementDecl),
    Function(FunctionDecl),
    Field(FieldDecl),
    Macro(MacroDecl),
    Destructor(DestructorDecl),
    Extern(ExternBlock),
    If {
        condition: Spanned<Expr>,
        then_branch: Box<Spanned<Stmt>>,
        else_branch: Option<Box<Spanned<Stmt>>>,
    },
    While {
        condition: Spanned<Expr>,
        body: Box<Spanned<Stmt>>,
    },
    For {
        init: Option<Box<Spanned<Stmt>>>,
        condition: Option<Spanned<Expr>>,
        update: Vec<Spanned<Expr>>,
        body: Box<Spanned<Stmt>>,
    },
    /// Low-level `for i in a..b`.
    ForRange {
        var: Ident,
        start: Spanned<Expr>,
        end: Spanned<Expr>,
        inclusive: bool,
        body: Box<Spanned<Stmt>>,
    },
    Foreach {
        var: Ident,
        ty: Option<Spanned<TypeExpr>>,
        iterable: Spanned<Expr>,
        body: Box<Spanned<Stmt>>,
    },
    DoWhile {
        body: Box<Spanned<Stmt>>,
        condition: Spanned<Expr>,
    },
    Switch {
        subject: Spanned<Expr>,
        cases: Vec<SwitchCase>,
    },
    Match {
        subject: Spanned<Expr>,
        arms: Vec<MatchArm>,
    },
    Try {
        body: Spanned<Block>,
        catches: Vec<CatchClause>,
        finally: Option<Spanned<Block>>,
    },
    Unsafe(Spanned<Block>),
    Fixed {
        decl: Box<Spanned<Stmt>>,
        body: Box<Spanned<Stmt>>,
    },
    /// `using (res) body` or the directive form `using a.b;` (no body).
    Using {
        resource: Box<Spanned<Stmt>>,
        body: Option<Box<Spanned<Stmt>>>,
    },
    Lock {
        target: Spanned<Expr>,
        body: Box<Spanned<Stmt>>,
    },
    Block(Block),
    Return(Option<Spanned<Expr>>),
    Break,
    Continue,
    /// `None` is a bare rethrow.
    Throw(Option<Spanned<Expr>>),
    /// `None` is `yield break`.
    Yield(Option<Spanned<Expr>>),
    InlineAsm {
        text: String,
    },
    Expr(Spanned<Expr>),
}

// ---------------------------------------------------------------------------
// Expressions

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    pub value: LiteralValue,
    /// Source spelling including any fused suffix, e.g. `42u8`.
    pub lexeme: String,
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// `·`
    Dot,
    Pow,
    Eq,
    Neq,
    ApproxEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Is,
    In,
    NotIn,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Union,
    Intersection,
    Range,
    RangeInclusive,
    Coalesce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    BitNot,
    PreIncrement,
    PreDecrement,
    Deref,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MathOp {
    Partial,
    Nabla,
    Sqrt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PostfixOp {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Coalesce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MemberAccess {
    /// `a.b`
    Dot,
    /// `a->b`
    Arrow,
    /// `a::b`
    Path,
}

/// One step after `?.`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ChainLink {
    Member { access: MemberAccess, name: Ident },
    Call(Vec<Spanned<Expr>>),
    Index(Spanned<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LambdaBody {
    Expr(Box<Spanned<Expr>>),
    Block(Spanned<Block>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldInit {
    pub name: Ident,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionItem {
    pub key: Option<Spanned<Expr>>,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InterpolationPart {
    Text(String),
    Expr(Spanned<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Literal(Literal),
    Ident(String),
    /// `$name` inside a macro body.
    MacroParam(String),
    Binary {
        op: BinaryOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Spanned<Expr>>,
    },
    MathPrefix {
        op: MathOp,
        operand: Box<Spanned<Expr>>,
    },
    Assign {
        op: AssignOp,
        target: Box<Spanned<Expr>>,
        value: Box<Spanned<Expr>>,
    },
    Call {
        callee: Box<Spanned<Expr>>,
        type_args: Vec<Spanned<TypeExpr>>,
        args: Vec<Spanned<Expr>>,
    },
    MacroCall {
        callee: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
    },
    Member {
        object: Box<Spanned<Expr>>,
        access: MemberAccess,
        name: Ident,
    },
    OptionalChain {
        object: Box<Spanned<Expr>>,
        chain: Vec<ChainLink>,
    },
    Index {
        object: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },
    Lambda {
        params: Vec<Param>,
        body: LambdaBody,
    },
    Conditional {
        condition: Box<Spanned<Expr>>,
        then_expr: Box<Spanned<Expr>>,
        else_expr: Box<Spanned<Expr>>,
    },
    New {
        ty: Spanned<TypeExpr>,
        args: Vec<Spanned<Expr>>,
        fields: Vec<FieldInit>,
    },
    NewArray {
        element: Spanned<TypeExpr>,
        size: Option<Box<Spanned<Expr>>>,
        elements: Vec<Spanned<Expr>>,
    },
    StackAlloc {
        element: Spanned<TypeExpr>,
        size: Box<Spanned<Expr>>,
    },
    Array(Vec<Spanned<Expr>>),
    Collection(Vec<CollectionItem>),
    StructLit {
        name: Ident,
        type_args: Vec<Spanned<TypeExpr>>,
        fields: Vec<FieldInit>,
    },
    Tuple(Vec<Spanned<Expr>>),
    Vector(Vec<Spanned<Expr>>),
    /// Rows of `[a, b; c, d]`.
    Matrix(Vec<Vec<Spanned<Expr>>>),
    /// `ℍ⟨w, x, y, z⟩`
    Quaternion(Box<[Spanned<Expr>; 4]>),
    Interpolated(Vec<InterpolationPart>),
    TypeTest {
        expr: Box<Spanned<Expr>>,
        ty: Spanned<TypeExpr>,
        binding: Option<Ident>,
    },
    Cast {
        expr: Box<Spanned<Expr>>,
        ty: Spanned<TypeExpr>,
    },
    TypeOf(Spanned<TypeExpr>),
    SizeOf(Spanned<TypeExpr>),
    NameOf(Box<Spanned<Expr>>),
    Ref {
        mutable: bool,
        expr: Box<Spanned<Expr>>,
    },
    Postfix {
        op: PostfixOp,
        operand: Box<Spanned<Expr>>,
    },
    Match {
        subject: Box<Spanned<Expr>>,
        arms: Vec<MatchArm>,
    },
    Throw(Box<Spanned<Expr>>),
    /// `lim[var -> approach] body`
    Limit {
        var: Ident,
        approach: Box<Spanned<Expr>>,
        body: Box<Spanned<Expr>>,
    },
    /// `∫[lo, hi] body dvar`, bounds absent for the indefinite form.
    Integral {
        bounds: Option<(Box<Spanned<Expr>>, Box<Spanned<Expr>>)>,
        body: Box<Spanned<Expr>>,
        var: Ident,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Pattern {
    Wildcard,
    Literal(Literal),
    Binding(String),
    Tuple(Vec<Spanned<Pattern>>),
}
