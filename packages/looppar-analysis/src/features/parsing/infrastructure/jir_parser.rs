//! Line-oriented reader for the textual IR (`.jir`)
//!
//! ```text
//! class DepTest {
//!     field static int counter
//!     method static void simpleNoDep1(int[]) {
//!         int[] a
//!         int i, $n, $v, $w
//!         a := @parameter0: int[]
//!         i = 0
//!     loop:
//!         $n = lengthof a
//!         if i >= $n goto done
//!         ...
//!         goto loop
//!     done:
//!         return
//!     }
//! }
//! ```
//!
//! One construct per line. `//` starts a comment. A statement may carry its
//! bytecode offset as a `[offset]` prefix.

use super::cursor::Cursor;
use crate::errors::{LoopParError, Result};
use crate::shared::models::{
    BinOp, Class, CondOp, Condition, Constant, Field, FieldRef, IdentitySource, Immediate,
    InvokeExpr, InvokeKind, Local, LocalId, Method, MethodId, MethodRef, Place, Program, Rvalue,
    Stmt, StmtId, Type,
};
use rustc_hash::FxHashMap;
use tracing::debug;

const INVOKE_KEYWORDS: [(&str, InvokeKind); 4] = [
    ("staticinvoke", InvokeKind::Static),
    ("virtualinvoke", InvokeKind::Virtual),
    ("specialinvoke", InvokeKind::Special),
    ("interfaceinvoke", InvokeKind::Interface),
];

const STMT_KEYWORDS: [&str; 9] = [
    "nop",
    "return",
    "throw",
    "goto",
    "if",
    "staticinvoke",
    "virtualinvoke",
    "specialinvoke",
    "interfaceinvoke",
];

/// Reader for the textual IR
#[derive(Debug, Default)]
pub struct JirParser;

impl JirParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, source: &str) -> Result<Program> {
        let mut program = Program::new();
        let mut state = State::Top;
        let mut last_line = 0;

        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            last_line = line_no;
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            state = match state {
                State::Top => State::InClass(parse_class_header(&mut program, line, line_no)?),
                State::InClass(class) => {
                    if line == "}" {
                        State::Top
                    } else if line.starts_with("field") {
                        parse_field(&mut program, line, line_no)?;
                        State::InClass(class)
                    } else if line.starts_with("method") {
                        let builder = parse_method_header(&class, line, line_no)?;
                        if builder.has_body {
                            State::InMethod(class, builder)
                        } else {
                            program.add_method(builder.finish()?);
                            State::InClass(class)
                        }
                    } else {
                        return Err(LoopParError::parse(
                            line_no,
                            format!("expected `field`, `method` or `}}`, found `{}`", line),
                        ));
                    }
                }
                State::InMethod(class, mut builder) => {
                    if line == "}" {
                        let method = builder.finish()?;
                        debug!(
                            method = %method.signature(),
                            statements = method.body.len(),
                            "parsed method"
                        );
                        program.add_method(method);
                        State::InClass(class)
                    } else {
                        builder.parse_body_line(line, line_no)?;
                        State::InMethod(class, builder)
                    }
                }
            };
        }

        match state {
            State::Top => Ok(program),
            _ => Err(LoopParError::parse(last_line, "unexpected end of input")),
        }
    }
}

enum State {
    Top,
    InClass(String),
    InMethod(String, MethodBuilder),
}

fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    let mut prev = '\0';
    for (i, c) in line.char_indices() {
        match c {
            '"' if prev != '\\' => in_string = !in_string,
            '/' if !in_string && prev == '/' => return &line[..i - 1],
            _ => {}
        }
        prev = c;
    }
    line
}

fn parse_type(c: &mut Cursor<'_>) -> Result<Type> {
    let name = c.type_name()?;
    Type::from_name(name).ok_or_else(|| c.error(format!("unknown type `{}`", name)))
}

fn parse_class_header(program: &mut Program, line: &str, line_no: usize) -> Result<String> {
    let mut c = Cursor::new(line, line_no);
    if !c.eat_keyword("class") {
        return Err(c.error(format!("expected `class`, found `{}`", line)));
    }
    let name = c.ident()?.to_string();
    let superclass = if c.eat_keyword("extends") {
        Some(c.ident()?.to_string())
    } else {
        None
    };
    let is_library = c.eat_keyword("library");
    c.expect("{")?;
    if !c.at_end() {
        return Err(c.error("trailing input after class header"));
    }
    if program.class(&name).is_some() {
        return Err(c.error(format!("class `{}` declared twice", name)));
    }
    program.add_class(Class {
        name: name.clone(),
        superclass,
        is_library,
        fields: Vec::new(),
        methods: Vec::new(),
    });
    Ok(name)
}

fn parse_field(program: &mut Program, line: &str, line_no: usize) -> Result<()> {
    let mut c = Cursor::new(line, line_no);
    c.expect("field")?;
    let is_static = c.eat_keyword("static");
    let ty = parse_type(&mut c)?;
    let name = c.ident()?.to_string();
    if !c.at_end() {
        return Err(c.error("trailing input after field declaration"));
    }
    if let Some(class) = program.classes.last_mut() {
        class.fields.push(Field {
            name,
            ty,
            is_static,
        });
    }
    Ok(())
}

fn parse_method_header(class: &str, line: &str, line_no: usize) -> Result<MethodBuilder> {
    let mut c = Cursor::new(line, line_no);
    c.expect("method")?;
    let (mut is_entry, mut is_static, mut is_native, mut is_abstract) = (false, false, false, false);
    loop {
        if c.eat_keyword("entry") {
            is_entry = true;
        } else if c.eat_keyword("static") {
            is_static = true;
        } else if c.eat_keyword("native") {
            is_native = true;
        } else if c.eat_keyword("abstract") {
            is_abstract = true;
        } else {
            break;
        }
    }
    let ret = parse_type(&mut c)?;
    let name = c.method_name()?.to_string();
    c.expect("(")?;
    let mut params = Vec::new();
    if !c.eat(")") {
        loop {
            params.push(parse_type(&mut c)?);
            if c.eat(")") {
                break;
            }
            c.expect(",")?;
        }
    }
    let has_body = if c.eat("{") {
        true
    } else if c.eat(";") {
        false
    } else {
        return Err(c.error("expected `{` or `;` after method header"));
    };
    if !c.at_end() {
        return Err(c.error("trailing input after method header"));
    }

    Ok(MethodBuilder {
        method: Method {
            id: MethodId(0),
            class_name: class.to_string(),
            name,
            params,
            ret,
            is_static,
            is_native,
            is_abstract,
            is_entry,
            locals: Vec::new(),
            body: Vec::new(),
            bytecode_offsets: Vec::new(),
        },
        has_body,
        header_line: line_no,
        local_index: FxHashMap::default(),
        labels: FxHashMap::default(),
        pending_labels: Vec::new(),
        fixups: Vec::new(),
    })
}

struct MethodBuilder {
    method: Method,
    has_body: bool,
    header_line: usize,
    local_index: FxHashMap<String, LocalId>,
    labels: FxHashMap<String, StmtId>,
    /// Labels waiting for the next statement
    pending_labels: Vec<(String, usize)>,
    /// (statement index, label, line) of unresolved branch targets
    fixups: Vec<(usize, String, usize)>,
}

impl MethodBuilder {
    fn parse_body_line(&mut self, line: &str, line_no: usize) -> Result<()> {
        if let Some(label) = line.strip_suffix(':') {
            let label = label.trim();
            if !label.is_empty() && label.chars().all(super::cursor::is_ident_char) {
                self.pending_labels.push((label.to_string(), line_no));
                return Ok(());
            }
        }

        if let Some(locals) = parse_local_decl(line, line_no) {
            let (ty, names) = locals?;
            for name in names {
                if self.local_index.contains_key(&name) {
                    return Err(LoopParError::parse(
                        line_no,
                        format!("local `{}` declared twice", name),
                    ));
                }
                let id = LocalId(self.method.locals.len() as u32);
                self.local_index.insert(name.clone(), id);
                self.method.locals.push(Local {
                    name,
                    ty: ty.clone(),
                });
            }
            return Ok(());
        }

        let mut c = Cursor::new(line, line_no);
        let offset = if c.eat("[") {
            let text = c.number()?;
            c.expect("]")?;
            Some(
                text.parse::<u32>()
                    .map_err(|_| c.error(format!("invalid bytecode offset `{}`", text)))?,
            )
        } else {
            None
        };

        let index = self.method.body.len();
        for (label, label_line) in self.pending_labels.drain(..) {
            if self.labels.insert(label.clone(), StmtId(index as u32)).is_some() {
                return Err(LoopParError::parse(
                    label_line,
                    format!("label `{}` defined twice", label),
                ));
            }
        }

        let stmt = self.parse_stmt(&mut c, index)?;
        if !c.at_end() {
            return Err(c.error("trailing input after statement"));
        }
        self.method.body.push(stmt);
        self.method.bytecode_offsets.push(offset);
        Ok(())
    }

    fn finish(mut self) -> Result<Method> {
        if let Some((label, line)) = self.pending_labels.first() {
            return Err(LoopParError::parse(
                *line,
                format!("label `{}` does not precede a statement", label),
            ));
        }
        for (index, label, line) in std::mem::take(&mut self.fixups) {
            let target = *self
                .labels
                .get(&label)
                .ok_or_else(|| LoopParError::parse(line, format!("unknown label `{}`", label)))?;
            match &mut self.method.body[index] {
                Stmt::If { target: t, .. } | Stmt::Goto(t) => *t = target,
                _ => {}
            }
        }
        if self.has_body && self.method.body.is_empty() {
            debug!(line = self.header_line, method = %self.method.name, "method declared with an empty body");
        }
        Ok(self.method)
    }

    fn local(&self, c: &mut Cursor<'_>) -> Result<LocalId> {
        let name = c.ident()?;
        self.local_index
            .get(name)
            .copied()
            .ok_or_else(|| c.error(format!("undeclared local `{}`", name)))
    }

    fn label_target(&mut self, c: &mut Cursor<'_>, index: usize) -> Result<StmtId> {
        let label = c.ident()?.to_string();
        self.fixups.push((index, label, c.line()));
        Ok(StmtId(u32::MAX))
    }

    fn parse_stmt(&mut self, c: &mut Cursor<'_>, index: usize) -> Result<Stmt> {
        if c.eat_keyword("nop") {
            return Ok(Stmt::Nop);
        }
        if c.eat_keyword("return") {
            if c.at_end() {
                return Ok(Stmt::Return(None));
            }
            return Ok(Stmt::Return(Some(self.immediate(c)?)));
        }
        if c.eat_keyword("throw") {
            return Ok(Stmt::Throw(self.immediate(c)?));
        }
        if c.eat_keyword("goto") {
            return Ok(Stmt::Goto(self.label_target(c, index)?));
        }
        if c.eat_keyword("if") {
            let lhs = self.immediate(c)?;
            let op = parse_cond_op(c)?;
            let rhs = self.immediate(c)?;
            if !c.eat_keyword("goto") {
                return Err(c.error("expected `goto` in conditional branch"));
            }
            let target = self.label_target(c, index)?;
            return Ok(Stmt::If {
                cond: Condition { op, lhs, rhs },
                target,
            });
        }
        if let Some(inv) = self.try_invoke(c)? {
            return Ok(Stmt::Invoke(inv));
        }

        let place = self.place(c)?;
        if c.eat(":=") {
            let local = match place {
                Place::Local(l) => l,
                _ => return Err(c.error("identity statement must assign a local")),
            };
            return Ok(Stmt::Identity {
                local,
                source: parse_identity_source(c)?,
            });
        }
        c.expect("=")?;
        let value = self.rvalue(c)?;
        Ok(Stmt::Assign { place, value })
    }

    fn place(&self, c: &mut Cursor<'_>) -> Result<Place> {
        if c.eat("<") {
            return Ok(Place::StaticField(parse_field_ref(c)?));
        }
        let base = self.local(c)?;
        if c.eat("[") {
            let index = self.immediate(c)?;
            c.expect("]")?;
            return Ok(Place::ArrayElem {
                base: Immediate::Local(base),
                index,
            });
        }
        if c.starts_with(".<") {
            c.expect(".")?;
            c.expect("<")?;
            return Ok(Place::InstanceField {
                base,
                field: parse_field_ref(c)?,
            });
        }
        Ok(Place::Local(base))
    }

    fn rvalue(&self, c: &mut Cursor<'_>) -> Result<Rvalue> {
        if let Some(inv) = self.try_invoke(c)? {
            return Ok(Rvalue::Invoke(inv));
        }
        if c.eat_keyword("new") {
            return Ok(Rvalue::New(c.ident()?.to_string()));
        }
        if c.eat_keyword("newarray") {
            c.expect("(")?;
            let elem = parse_type(c)?;
            c.expect(")")?;
            c.expect("[")?;
            let size = self.immediate(c)?;
            c.expect("]")?;
            return Ok(Rvalue::NewArray { elem, size });
        }
        if c.eat_keyword("newmultiarray") {
            c.expect("(")?;
            let elem = parse_type(c)?;
            c.expect(")")?;
            let mut sizes = Vec::new();
            while c.eat("[") {
                if c.eat("]") {
                    continue;
                }
                sizes.push(self.immediate(c)?);
                c.expect("]")?;
            }
            if sizes.is_empty() {
                return Err(c.error("newmultiarray needs at least one dimension size"));
            }
            return Ok(Rvalue::NewMultiArray { elem, sizes });
        }
        if c.eat_keyword("lengthof") {
            return Ok(Rvalue::Length(self.immediate(c)?));
        }
        if c.eat_keyword("neg") {
            return Ok(Rvalue::Neg(self.immediate(c)?));
        }
        if c.eat("(") {
            let ty = parse_type(c)?;
            c.expect(")")?;
            return Ok(Rvalue::Cast {
                ty,
                value: self.immediate(c)?,
            });
        }
        if c.eat("<") {
            return Ok(Rvalue::StaticField(parse_field_ref(c)?));
        }

        let first = self.immediate(c)?;
        if let Immediate::Local(base) = first {
            if c.eat("[") {
                let index = self.immediate(c)?;
                c.expect("]")?;
                return Ok(Rvalue::ArrayRead {
                    base: Immediate::Local(base),
                    index,
                });
            }
            if c.starts_with(".<") {
                c.expect(".")?;
                c.expect("<")?;
                return Ok(Rvalue::InstanceField {
                    base,
                    field: parse_field_ref(c)?,
                });
            }
        }
        if c.at_end() {
            return Ok(Rvalue::Use(first));
        }
        let op = parse_bin_op(c)?;
        let rhs = self.immediate(c)?;
        Ok(Rvalue::Binary {
            op,
            lhs: first,
            rhs,
        })
    }

    fn try_invoke(&self, c: &mut Cursor<'_>) -> Result<Option<InvokeExpr>> {
        let kind = match INVOKE_KEYWORDS.iter().find(|(kw, _)| c.eat_keyword(kw)) {
            Some((_, kind)) => *kind,
            None => return Ok(None),
        };
        let receiver = if kind == InvokeKind::Static {
            None
        } else {
            let r = self.local(c)?;
            c.expect(".")?;
            Some(r)
        };
        c.expect("<")?;
        let method = parse_method_ref(c)?;
        c.expect("(")?;
        let mut args = Vec::new();
        if !c.eat(")") {
            loop {
                args.push(self.immediate(c)?);
                if c.eat(")") {
                    break;
                }
                c.expect(",")?;
            }
        }
        Ok(Some(InvokeExpr {
            kind,
            receiver,
            method,
            args,
        }))
    }

    fn immediate(&self, c: &mut Cursor<'_>) -> Result<Immediate> {
        match c.peek_char() {
            Some('"') => Ok(Immediate::Const(Constant::Str(c.string()?))),
            Some(ch) if ch.is_ascii_digit() || ch == '-' => {
                let text = c.number()?;
                parse_number(text)
                    .map(Immediate::Const)
                    .ok_or_else(|| c.error(format!("invalid numeric literal `{}`", text)))
            }
            Some(_) if c.eat_keyword("null") => Ok(Immediate::Const(Constant::Null)),
            Some(_) => Ok(Immediate::Local(self.local(c)?)),
            None => Err(c.error("expected operand")),
        }
    }
}

/// `Some(Ok(..))` when the line is a local declaration such as `int i, $n`
fn parse_local_decl(line: &str, line_no: usize) -> Option<Result<(Type, Vec<String>)>> {
    let mut c = Cursor::new(line, line_no);
    if STMT_KEYWORDS.iter().any(|kw| c.eat_keyword(kw)) {
        return None;
    }
    let ty = Type::from_name(c.type_name().ok()?)?;
    let mut names = vec![c.ident().ok()?.to_string()];
    while c.eat(",") {
        match c.ident() {
            Ok(name) => names.push(name.to_string()),
            Err(e) => return Some(Err(e)),
        }
    }
    if !c.at_end() {
        return None;
    }
    Some(Ok((ty, names)))
}

fn parse_identity_source(c: &mut Cursor<'_>) -> Result<IdentitySource> {
    c.expect("@")?;
    let word = c.ident()?;
    let source = if word == "this" {
        IdentitySource::This
    } else if word == "caughtexception" {
        IdentitySource::CaughtException
    } else if let Some(n) = word.strip_prefix("parameter") {
        IdentitySource::Parameter(
            n.parse()
                .map_err(|_| c.error(format!("invalid parameter index in `@{}`", word)))?,
        )
    } else {
        return Err(c.error(format!("unknown identity source `@{}`", word)));
    };
    if c.eat(":") {
        parse_type(c)?;
    }
    Ok(source)
}

fn parse_cond_op(c: &mut Cursor<'_>) -> Result<CondOp> {
    for sym in ["==", "!=", "<=", ">=", "<", ">"] {
        if c.eat(sym) {
            return CondOp::from_symbol(sym).ok_or_else(|| c.error("bad comparison"));
        }
    }
    Err(c.error("expected comparison operator"))
}

fn parse_bin_op(c: &mut Cursor<'_>) -> Result<BinOp> {
    for sym in [">>>", "<<", ">>", "+", "-", "*", "/", "%", "&", "|", "^"] {
        if c.eat(sym) {
            return BinOp::from_symbol(sym).ok_or_else(|| c.error("bad operator"));
        }
    }
    for word in ["cmpl", "cmpg", "cmp"] {
        if c.eat_keyword(word) {
            return BinOp::from_symbol(word).ok_or_else(|| c.error("bad operator"));
        }
    }
    Err(c.error("expected binary operator"))
}

fn parse_number(text: &str) -> Option<Constant> {
    if let Some(v) = text.strip_suffix(['L', 'l']) {
        return v.parse().ok().map(Constant::Long);
    }
    if let Some(v) = text.strip_suffix(['F', 'f']) {
        return v.parse().ok().map(Constant::Float);
    }
    if text.contains(['.', 'e', 'E']) {
        return text.parse().ok().map(Constant::Double);
    }
    text.parse().ok().map(Constant::Int)
}

/// `Class: type name` after the opening `<`
fn parse_field_ref(c: &mut Cursor<'_>) -> Result<FieldRef> {
    let body = c.angle_body()?;
    let (class, rest) = body
        .split_once(':')
        .ok_or_else(|| c.error(format!("malformed field reference `<{}>`", body)))?;
    let parts: Vec<&str> = rest.split_whitespace().collect();
    match parts.as_slice() {
        [ty, name] => Ok(FieldRef {
            class: class.trim().to_string(),
            ty: Type::from_name(ty).ok_or_else(|| c.error(format!("unknown type `{}`", ty)))?,
            name: name.to_string(),
        }),
        _ => Err(c.error(format!("malformed field reference `<{}>`", body))),
    }
}

/// `Class: ret name(params)` after the opening `<`
fn parse_method_ref(c: &mut Cursor<'_>) -> Result<MethodRef> {
    let body = c.angle_body()?;
    let malformed = || c.error(format!("malformed method reference `<{}>`", body));
    let (class, rest) = body.split_once(':').ok_or_else(malformed)?;
    let rest = rest.trim();
    let (ret, rest) = rest.split_once(char::is_whitespace).ok_or_else(malformed)?;
    let open = rest.find('(').ok_or_else(malformed)?;
    let close = rest.rfind(')').ok_or_else(malformed)?;
    if close < open {
        return Err(malformed());
    }
    let name = rest[..open].trim();
    let params_text = rest[open + 1..close].trim();
    let params = if params_text.is_empty() {
        Vec::new()
    } else {
        params_text
            .split(',')
            .map(|p| Type::from_name(p).ok_or_else(malformed))
            .collect::<Result<Vec<_>>>()?
    };
    Ok(MethodRef {
        class: class.trim().to_string(),
        name: name.to_string(),
        params,
        ret: Type::from_name(ret).ok_or_else(malformed)?,
    })
}
