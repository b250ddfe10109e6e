//! Content fingerprint of a graph (BLAKE3).
//!
//! The fingerprint covers everything a consumer of the graph observes:
//! scalar metadata, constants (bit patterns), operators with arguments,
//! both name tables and the dependent list. Two graphs with the same
//! fingerprint describe the same function.

use super::Graph;

// Section tags keep adjacent variable-length sections from aliasing.
const TAG_HEADER: u8 = 0x01;
const TAG_CONSTANT: u8 = 0x02;
const TAG_OPERATOR: u8 = 0x03;
const TAG_ATOMIC_NAME: u8 = 0x04;
const TAG_DISCRETE_NAME: u8 = 0x05;
const TAG_DEPENDENT: u8 = 0x06;

/// A 256-bit graph fingerprint.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphHash(pub [u8; 32]);

impl GraphHash {
    /// Display as full hex.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Display as short base-32 (8 characters, 40 bits).
    pub fn to_short(&self) -> String {
        const ALPHABET: &[u8] = b"0123456789abcdefghjkmnpqrstuvwxyz";
        let val = u64::from_be_bytes([
            0, 0, 0, self.0[0], self.0[1], self.0[2], self.0[3], self.0[4],
        ]);
        let mut result = String::with_capacity(8);
        for i in (0..8).rev() {
            let idx = ((val >> (i * 5)) & 0x1F) as usize;
            result.push(ALPHABET[idx] as char);
        }
        result
    }
}

impl std::fmt::Debug for GraphHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.to_short())
    }
}

impl std::fmt::Display for GraphHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.to_short())
    }
}

fn put_usize(buf: &mut Vec<u8>, n: usize) {
    buf.extend_from_slice(&(n as u64).to_le_bytes());
}

fn put_str(buf: &mut Vec<u8>, s: &str) {
    put_usize(buf, s.len());
    buf.extend_from_slice(s.as_bytes());
}

impl Graph {
    /// Deterministic fingerprint of the graph content.
    pub fn fingerprint(&self) -> GraphHash {
        let mut buf = Vec::new();

        buf.push(TAG_HEADER);
        put_str(&mut buf, self.function_name());
        put_usize(&mut buf, self.n_dynamic_ind());
        put_usize(&mut buf, self.n_variable_ind());

        for value in self.constants() {
            buf.push(TAG_CONSTANT);
            buf.extend_from_slice(&value.to_bits().to_le_bytes());
        }
        for operator in self.operators() {
            buf.push(TAG_OPERATOR);
            buf.push(operator.op as u8);
            put_usize(&mut buf, operator.args.len());
            for &arg in operator.args {
                put_usize(&mut buf, arg);
            }
        }
        for name in self.atomic_names() {
            buf.push(TAG_ATOMIC_NAME);
            put_str(&mut buf, name);
        }
        for name in self.discrete_names() {
            buf.push(TAG_DISCRETE_NAME);
            put_str(&mut buf, name);
        }
        for &node in self.dependents() {
            buf.push(TAG_DEPENDENT);
            put_usize(&mut buf, node);
        }

        GraphHash(*blake3::hash(&buf).as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{Graph, GraphOp, GraphSink};

    fn product(name: &str) -> Graph {
        let mut g = Graph::new();
        g.set_function_name(name);
        g.set_n_variable_ind(2);
        g.push_operator(GraphOp::Mul);
        g.push_operator_arg(1);
        g.push_operator_arg(2);
        g.push_dependent(3);
        g
    }

    #[test]
    fn fingerprint_is_deterministic() {
        assert_eq!(product("f").fingerprint(), product("f").fingerprint());
    }

    #[test]
    fn fingerprint_sees_every_section() {
        let base = product("f").fingerprint();
        assert_ne!(base, product("g").fingerprint());

        let mut swapped = Graph::new();
        swapped.set_function_name("f");
        swapped.set_n_variable_ind(2);
        swapped.push_operator(GraphOp::Mul);
        swapped.push_operator_arg(2);
        swapped.push_operator_arg(1);
        swapped.push_dependent(3);
        assert_ne!(base, swapped.fingerprint());

        let mut extra = product("f");
        extra.push_constant(0.0);
        assert_ne!(base, extra.fingerprint());
    }

    #[test]
    fn short_form() {
        let h = product("f").fingerprint();
        assert_eq!(h.to_short().len(), 8);
        assert_eq!(h.to_hex().len(), 64);
        assert!(format!("{}", h).starts_with('#'));
    }
}
