//! Functions and modules.

use super::{CallingConvention, InstRef, Instruction, Type, ValueData, ValueKind, ValueRef};

/// A function: value arena plus instructions in program order.
///
/// Blocks are not materialized; labels are values and instructions of all
/// blocks are stored in the order they appear.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub(crate) values: Vec<ValueData>,
    pub(crate) args: Vec<ValueRef>,
    pub(crate) instructions: Vec<Instruction>,
}

impl Function {
    /// Create an empty function with the six standard arguments.
    pub fn new(name: &str) -> Self {
        let arg_names = ["len_input", "input", "len_output", "output", "len_msg", "msg"];
        let mut func = Self {
            name: name.to_string(),
            values: Vec::new(),
            args: Vec::new(),
            instructions: Vec::new(),
        };
        for (i, ty) in CallingConvention::argument_types().into_iter().enumerate() {
            let v = func.push_value(ValueKind::Argument(i as u32), ty, Some(arg_names[i]));
            func.args.push(v);
        }
        func
    }

    /// Create a function with explicit argument types and names.
    ///
    /// Used by the text reader, which accepts any signature and leaves the
    /// calling-convention check to the translator.
    pub fn with_args(name: &str, args: &[(Type, String)]) -> Self {
        let mut func = Self {
            name: name.to_string(),
            values: Vec::new(),
            args: Vec::new(),
            instructions: Vec::new(),
        };
        for (i, (ty, arg_name)) in args.iter().enumerate() {
            let v = func.push_value(ValueKind::Argument(i as u32), ty.clone(), Some(arg_name.as_str()));
            func.args.push(v);
        }
        func
    }

    pub(crate) fn push_value(&mut self, kind: ValueKind, ty: Type, name: Option<&str>) -> ValueRef {
        let index = self.values.len() as u32;
        self.values.push(ValueData {
            kind,
            ty,
            name: name.map(str::to_string),
        });
        ValueRef(index)
    }

    pub fn value(&self, v: ValueRef) -> &ValueData {
        &self.values[v.0 as usize]
    }

    /// The value arena entry, or `None` for a foreign handle.
    pub fn try_value(&self, v: ValueRef) -> Option<&ValueData> {
        self.values.get(v.0 as usize)
    }

    pub fn ty(&self, v: ValueRef) -> &Type {
        &self.value(v).ty
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    pub fn args(&self) -> &[ValueRef] {
        &self.args
    }

    pub fn arg(&self, index: usize) -> Option<ValueRef> {
        self.args.get(index).copied()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn instruction(&self, inst: InstRef) -> &Instruction {
        &self.instructions[inst.0 as usize]
    }

    /// Integer value of a `ConstInt`.
    pub fn int_constant(&self, v: ValueRef) -> Option<u64> {
        match self.try_value(v)?.kind {
            ValueKind::ConstInt(n) => Some(n),
            _ => None,
        }
    }

    /// Float value of a `ConstFloat`.
    pub fn float_constant(&self, v: ValueRef) -> Option<f64> {
        match self.try_value(v)?.kind {
            ValueKind::ConstFloat(x) => Some(x),
            _ => None,
        }
    }

    pub fn is_float_constant(&self, v: ValueRef) -> bool {
        self.float_constant(v).is_some()
    }

    /// Symbol name of a `Function` value.
    pub fn symbol_name(&self, v: ValueRef) -> Option<&str> {
        match &self.try_value(v)?.kind {
            ValueKind::Function(name) => Some(name),
            _ => None,
        }
    }

    /// Printable name of a value for messages: `%name`, `@name`, the
    /// literal, or `%<index>` for unnamed values.
    pub fn display_value(&self, v: ValueRef) -> String {
        let Some(data) = self.try_value(v) else {
            return format!("<invalid {}>", v.0);
        };
        match &data.kind {
            ValueKind::ConstFloat(x) => format!("{:?}", x),
            ValueKind::ConstInt(n) => n.to_string(),
            ValueKind::Function(name) => format!("@{}", name),
            _ => match &data.name {
                Some(name) => format!("%{}", name),
                None => format!("%{}", v.0),
            },
        }
    }
}

/// A set of functions read from one IR text.
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub functions: Vec<Function>,
}

impl Module {
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// The only function, if there is exactly one.
    pub fn single(&self) -> Option<&Function> {
        match self.functions.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.functions.iter().map(|f| f.name.as_str()).collect()
    }
}
