//! Graphviz Export
//!
//! Renders a dataflow as a `dot` digraph. Variables become green boxes
//! labelled `name` or `name=value`; operators become three-slot records
//! `<lhs>|op|<rhs>` with an edge from each operand into its slot. Nodes are
//! emitted in creation order and identified by arena slot.

use std::fmt::Write;

use super::dataflow::Dataflow;
use super::node::Node;
use crate::error::Result;

impl Dataflow {
    /// Write the Graphviz description of this dataflow to `w`.
    pub fn write_graphviz<W: Write>(&self, w: &mut W) -> Result<()> {
        writeln!(w, "digraph dataflow {{")?;
        writeln!(w, "rankdir=TB")?;
        for (slot, node) in self.nodes.iter().enumerate() {
            let id = self.handle(slot);
            match node {
                Node::Variable(var) => {
                    write!(w, "{id} [label=\"")?;
                    write_escaped(w, var.name())?;
                    if let Some(value) = var.value() {
                        write!(w, "={value}")?;
                    }
                    writeln!(
                        w,
                        "\", shape=rect, color=darkgreen, style=filled, fillcolor=palegreen]"
                    )?;
                }
                Node::BinaryOp(op) => {
                    writeln!(
                        w,
                        "{id} [label=\"<lhs>|{}|<rhs>\", shape=Mrecord, color=blue, \
                         style=filled, fillcolor=lightblue]",
                        op.op()
                    )?;
                    writeln!(w, "{}->{id}:lhs", self.handle(op.lhs_slot()))?;
                    writeln!(w, "{}->{id}:rhs", self.handle(op.rhs_slot()))?;
                }
            }
        }
        writeln!(w, "}}")?;
        Ok(())
    }

    /// Returns the Graphviz description of this dataflow.
    pub fn dump_to_graphviz(&self) -> Result<String> {
        let mut dot = String::new();
        self.write_graphviz(&mut dot)?;
        Ok(dot)
    }
}

/// Write `text` as the body of a quoted `dot` string.
fn write_escaped<W: Write>(w: &mut W, text: &str) -> std::fmt::Result {
    for c in text.chars() {
        match c {
            '"' | '\\' => write!(w, "\\{c}")?,
            '\n' => w.write_str("\\n")?,
            _ => w.write_char(c)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph() {
        let dag = Dataflow::new();
        assert_eq!(
            dag.dump_to_graphviz().unwrap(),
            "digraph dataflow {\nrankdir=TB\n}\n"
        );
    }

    #[test]
    fn variables_and_operators() {
        let mut dag = Dataflow::new();
        let a = dag.declare_variable("a").unwrap();
        let b = dag.declare_variable("b").unwrap();
        dag.create_binary_op('*', a, b).unwrap();
        dag.assign(a, 3).unwrap();

        let expected = "digraph dataflow {\n\
            rankdir=TB\n\
            Node_0 [label=\"a=3\", shape=rect, color=darkgreen, style=filled, fillcolor=palegreen]\n\
            Node_1 [label=\"b\", shape=rect, color=darkgreen, style=filled, fillcolor=palegreen]\n\
            Node_2 [label=\"<lhs>|*|<rhs>\", shape=Mrecord, color=blue, style=filled, fillcolor=lightblue]\n\
            Node_0->Node_2:lhs\n\
            Node_1->Node_2:rhs\n\
            }\n";
        assert_eq!(dag.dump_to_graphviz().unwrap(), expected);
    }

    #[test]
    fn labels_are_escaped() {
        let mut dag = Dataflow::new();
        let quoted = dag.declare_variable("say \"hi\"").unwrap();
        dag.declare_variable("x\\").unwrap();
        dag.declare_variable("two\nlines").unwrap();
        dag.assign(quoted, 1).unwrap();

        let dot = dag.dump_to_graphviz().unwrap();
        let lines: Vec<&str> = dot.lines().collect();
        assert_eq!(
            lines[2],
            r#"Node_0 [label="say \"hi\"=1", shape=rect, color=darkgreen, style=filled, fillcolor=palegreen]"#
        );
        assert_eq!(
            lines[3],
            r#"Node_1 [label="x\\", shape=rect, color=darkgreen, style=filled, fillcolor=palegreen]"#
        );
        assert!(lines[4].starts_with(r#"Node_2 [label="two\nlines""#));
    }

    #[test]
    fn shared_operand_gets_two_edges() {
        let mut dag = Dataflow::new();
        let x = dag.declare_variable("x").unwrap();
        dag.add(x, x).unwrap();

        let dot = dag.dump_to_graphviz().unwrap();
        assert!(dot.contains("Node_0->Node_1:lhs\n"));
        assert!(dot.contains("Node_0->Node_1:rhs\n"));
    }
}
