//! Target-code backend: an in-memory instruction builder
//!
//! The code generator drives this builder through a shared insertion cursor,
//! so instruction order is exactly call order. Functions hold labelled basic
//! blocks; values are numbered per function in creation order.
//!
//! The textual [`Builder::dump`] is deterministic and is what tests and the
//! CLI compare against.

use std::fmt;

/// Handle to an SSA value inside the current function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueId(pub u32);

/// Handle to a declared function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(pub u32);

/// Handle to a basic block inside a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockId(pub u32);

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Backend representation of a language type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendType {
    Int32,
    UInt32,
    Void,
    Array {
        element: Box<BackendType>,
        length: u64,
    },
    Reference(Box<BackendType>),
}

impl BackendType {
    /// Map a primitive type name to its backend type.
    ///
    /// Returns `None` for names the backend has no representation for.
    pub fn from_primitive(identifier: &str, is_unsigned: bool) -> Option<BackendType> {
        match (identifier, is_unsigned) {
            ("int", false) => Some(BackendType::Int32),
            ("int", true) => Some(BackendType::UInt32),
            ("void", false) => Some(BackendType::Void),
            _ => None,
        }
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendType::Int32 => write!(f, "int32"),
            BackendType::UInt32 => write!(f, "uint32"),
            BackendType::Void => write!(f, "void"),
            BackendType::Array { element, length } => write!(f, "[{} x {}]", length, element),
            BackendType::Reference(element) => write!(f, "{}&", element),
        }
    }
}

/// Integer comparison condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpCond {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for CmpCond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CmpCond::Eq => "eq",
            CmpCond::Ne => "ne",
            CmpCond::Lt => "lt",
            CmpCond::Le => "le",
            CmpCond::Gt => "gt",
            CmpCond::Ge => "ge",
        };
        write!(f, "{}", s)
    }
}

/// A single backend instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr {
    ConstInt {
        dest: ValueId,
        value: i32,
    },
    Add {
        dest: ValueId,
        lhs: ValueId,
        rhs: ValueId,
    },
    Sub {
        dest: ValueId,
        lhs: ValueId,
        rhs: ValueId,
    },
    Mul {
        dest: ValueId,
        lhs: ValueId,
        rhs: ValueId,
    },
    SDiv {
        dest: ValueId,
        lhs: ValueId,
        rhs: ValueId,
    },
    ICmp {
        dest: ValueId,
        cond: CmpCond,
        lhs: ValueId,
        rhs: ValueId,
    },
    Br {
        target: BlockId,
    },
    CondBr {
        cond: ValueId,
        then_block: BlockId,
        else_block: BlockId,
    },
    Call {
        dest: ValueId,
        callee: FunctionId,
        args: Vec<ValueId>,
    },
    Ret {
        value: Option<ValueId>,
    },
}

/// A labelled sequence of instructions.
#[derive(Debug, Clone)]
pub struct BasicBlock {
    pub label: String,
    pub instrs: Vec<Instr>,
}

/// A declared function with its blocks.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub ret: BackendType,
    pub params: Vec<BackendType>,
    pub blocks: Vec<BasicBlock>,
    next_value: u32,
}

/// The instruction builder.
///
/// Holds every declared function plus one process-wide insertion cursor.
/// All `build_*` calls append at the cursor; callers must position it with
/// [`Builder::position_at_end`] before emitting.
#[derive(Debug, Default)]
pub struct Builder {
    functions: Vec<Function>,
    cursor: Option<(FunctionId, BlockId)>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a function. The declaration order is the dump order.
    pub fn declare_function(
        &mut self,
        name: &str,
        ret: BackendType,
        params: Vec<BackendType>,
    ) -> FunctionId {
        let id = FunctionId(self.functions.len() as u32);
        self.functions.push(Function {
            name: name.to_string(),
            ret,
            params,
            blocks: Vec::new(),
            next_value: 0,
        });
        id
    }

    /// Append a new empty block to `func`.
    pub fn append_block(&mut self, func: FunctionId, label: &str) -> BlockId {
        let function = &mut self.functions[func.0 as usize];
        let id = BlockId(function.blocks.len() as u32);
        function.blocks.push(BasicBlock {
            label: label.to_string(),
            instrs: Vec::new(),
        });
        id
    }

    /// Move the insertion cursor to the end of `block` in `func`.
    pub fn position_at_end(&mut self, func: FunctionId, block: BlockId) {
        self.cursor = Some((func, block));
    }

    pub fn has_insert_point(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.0 as usize]
    }

    fn fresh_value(&mut self) -> ValueId {
        let (func, _) = self.cursor.expect("insertion point not set");
        let function = &mut self.functions[func.0 as usize];
        let id = ValueId(function.next_value);
        function.next_value += 1;
        id
    }

    fn push(&mut self, instr: Instr) {
        let (func, block) = self.cursor.expect("insertion point not set");
        self.functions[func.0 as usize].blocks[block.0 as usize]
            .instrs
            .push(instr);
    }

    /// Materialize a 32-bit integer constant at the cursor.
    pub fn const_int32(&mut self, value: i32) -> ValueId {
        let dest = self.fresh_value();
        self.push(Instr::ConstInt { dest, value });
        dest
    }

    pub fn build_add(&mut self, lhs: ValueId, rhs: ValueId) -> ValueId {
        let dest = self.fresh_value();
        self.push(Instr::Add { dest, lhs, rhs });
        dest
    }

    pub fn build_sub(&mut self, lhs: ValueId, rhs: ValueId) -> ValueId {
        let dest = self.fresh_value();
        self.push(Instr::Sub { dest, lhs, rhs });
        dest
    }

    pub fn build_mul(&mut self, lhs: ValueId, rhs: ValueId) -> ValueId {
        let dest = self.fresh_value();
        self.push(Instr::Mul { dest, lhs, rhs });
        dest
    }

    pub fn build_sdiv(&mut self, lhs: ValueId, rhs: ValueId) -> ValueId {
        let dest = self.fresh_value();
        self.push(Instr::SDiv { dest, lhs, rhs });
        dest
    }

    pub fn build_icmp(&mut self, cond: CmpCond, lhs: ValueId, rhs: ValueId) -> ValueId {
        let dest = self.fresh_value();
        self.push(Instr::ICmp {
            dest,
            cond,
            lhs,
            rhs,
        });
        dest
    }

    pub fn build_br(&mut self, target: BlockId) {
        self.push(Instr::Br { target });
    }

    pub fn build_cond_br(&mut self, cond: ValueId, then_block: BlockId, else_block: BlockId) {
        self.push(Instr::CondBr {
            cond,
            then_block,
            else_block,
        });
    }

    pub fn build_call(&mut self, callee: FunctionId, args: Vec<ValueId>) -> ValueId {
        let dest = self.fresh_value();
        self.push(Instr::Call { dest, callee, args });
        dest
    }

    pub fn build_return(&mut self, value: Option<ValueId>) {
        self.push(Instr::Ret { value });
    }

    /// Render the whole module as deterministic text.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for function in &self.functions {
            if !out.is_empty() {
                out.push('\n');
            }
            let params = function
                .params
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!(
                "define {} @{}({}) {{\n",
                function.ret, function.name, params
            ));
            for block in &function.blocks {
                out.push_str(&format!("{}:\n", block.label));
                for instr in &block.instrs {
                    out.push_str("  ");
                    out.push_str(&self.render_instr(function, instr));
                    out.push('\n');
                }
            }
            out.push_str("}\n");
        }
        out
    }

    fn render_instr(&self, function: &Function, instr: &Instr) -> String {
        match instr {
            Instr::ConstInt { dest, value } => format!("{} = const {}", dest, value),
            Instr::Add { dest, lhs, rhs } => format!("{} = add {}, {}", dest, lhs, rhs),
            Instr::Sub { dest, lhs, rhs } => format!("{} = sub {}, {}", dest, lhs, rhs),
            Instr::Mul { dest, lhs, rhs } => format!("{} = mul {}, {}", dest, lhs, rhs),
            Instr::SDiv { dest, lhs, rhs } => format!("{} = sdiv {}, {}", dest, lhs, rhs),
            Instr::ICmp {
                dest,
                cond,
                lhs,
                rhs,
            } => format!("{} = icmp {} {}, {}", dest, cond, lhs, rhs),
            Instr::Br { target } => {
                format!("br {}", function.blocks[target.0 as usize].label)
            }
            Instr::CondBr {
                cond,
                then_block,
                else_block,
            } => format!(
                "condbr {}, {}, {}",
                cond,
                function.blocks[then_block.0 as usize].label,
                function.blocks[else_block.0 as usize].label
            ),
            Instr::Call { dest, callee, args } => {
                let rendered = args
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "{} = call @{}({})",
                    dest, self.functions[callee.0 as usize].name, rendered
                )
            }
            Instr::Ret { value: Some(v) } => format!("ret {}", v),
            Instr::Ret { value: None } => "ret void".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_and_return_dump() {
        let mut builder = Builder::new();
        let main = builder.declare_function("main", BackendType::Int32, vec![]);
        let entry = builder.append_block(main, "entry");
        builder.position_at_end(main, entry);

        let a = builder.const_int32(7);
        let b = builder.const_int32(6);
        let product = builder.build_mul(a, b);
        builder.build_return(Some(product));

        let expected = "\
define int32 @main() {
entry:
  %0 = const 7
  %1 = const 6
  %2 = mul %0, %1
  ret %2
}
";
        assert_eq!(builder.dump(), expected);
        // Same tree of calls, same text.
        assert_eq!(builder.dump(), builder.dump());
    }

    #[test]
    fn test_compare_and_branch() {
        let mut builder = Builder::new();
        let f = builder.declare_function("positive", BackendType::Int32, vec![BackendType::Int32]);
        let entry = builder.append_block(f, "entry");
        let yes = builder.append_block(f, "yes");
        let no = builder.append_block(f, "no");

        builder.position_at_end(f, entry);
        let zero = builder.const_int32(0);
        let one = builder.const_int32(1);
        let cond = builder.build_icmp(CmpCond::Gt, one, zero);
        builder.build_cond_br(cond, yes, no);

        builder.position_at_end(f, yes);
        builder.build_br(no);

        builder.position_at_end(f, no);
        builder.build_return(Some(zero));

        let dump = builder.dump();
        assert!(dump.contains("%2 = icmp gt %1, %0"));
        assert!(dump.contains("condbr %2, yes, no"));
        assert!(dump.contains("br no"));
        assert!(dump.contains("define int32 @positive(int32)"));
    }

    #[test]
    fn test_call_renders_callee_name() {
        let mut builder = Builder::new();
        let callee = builder.declare_function("f", BackendType::Void, vec![BackendType::Int32]);
        let main = builder.declare_function("main", BackendType::Int32, vec![]);
        let entry = builder.append_block(main, "entry");
        builder.position_at_end(main, entry);

        let arg = builder.const_int32(3);
        builder.build_call(callee, vec![arg]);

        assert!(builder.dump().contains("%1 = call @f(%0)"));
        // Declaration order is preserved in the dump.
        let dump = builder.dump();
        assert!(dump.find("@f").unwrap() < dump.find("@main").unwrap());
    }

    #[test]
    fn test_primitive_type_mapping() {
        assert_eq!(
            BackendType::from_primitive("int", false),
            Some(BackendType::Int32)
        );
        assert_eq!(
            BackendType::from_primitive("int", true),
            Some(BackendType::UInt32)
        );
        assert_eq!(
            BackendType::from_primitive("void", false),
            Some(BackendType::Void)
        );
        assert_eq!(BackendType::from_primitive("float", false), None);
    }

    #[test]
    fn test_type_display() {
        let ty = BackendType::Array {
            element: Box::new(BackendType::UInt32),
            length: 5,
        };
        assert_eq!(ty.to_string(), "[5 x uint32]");
        let r = BackendType::Reference(Box::new(BackendType::Int32));
        assert_eq!(r.to_string(), "int32&");
    }
}
