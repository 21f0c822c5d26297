use super::visualizer::Visualizer;
use core::fmt;
use libket_core::{Circuit, GateOp};

/// One text lane per qubit, gates appended column by column in history order.
pub struct HorizontalRenderer<'a> {
    circuit: &'a Circuit,
}

impl<'a> HorizontalRenderer<'a> {
    pub fn new(circuit: &'a Circuit) -> Self {
        HorizontalRenderer { circuit }
    }
}

impl<'a> Visualizer for HorizontalRenderer<'a> {
    fn export(&self) -> String {
        format!("{}", self)
    }
}

fn boxed(label: &str) -> String {
    format!("─[{}]─", label)
}

fn filler(width: usize) -> String {
    "─".repeat(width)
}

impl<'a> fmt::Display for HorizontalRenderer<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nq = self.circuit.num_qubits();
        let mut lines: Vec<String> = (0..nq).map(|i| format!("q{:<2}: ", i)).collect();

        if self.circuit.operations().is_empty() {
            for line in &lines {
                writeln!(f, "{}───", line)?;
            }
            return Ok(());
        }

        for op in self.circuit.operations() {
            match op {
                GateOp::H(t)
                | GateOp::X(t)
                | GateOp::Y(t)
                | GateOp::Z(t)
                | GateOp::P(t, _)
                | GateOp::Rx(t, _)
                | GateOp::Ry(t, _)
                | GateOp::Rz(t, _) => {
                    let label = boxed(op.name());
                    let width = label.chars().count();
                    for (i, line) in lines.iter_mut().enumerate() {
                        if i == *t {
                            line.push_str(&label);
                        } else {
                            line.push_str(&filler(width));
                        }
                    }
                }
                GateOp::Cnot(c, t) => {
                    for (i, line) in lines.iter_mut().enumerate() {
                        if i == *c {
                            line.push_str("──∙──");
                        } else if i == *t {
                            line.push_str("──⊕──");
                        } else {
                            line.push_str(&filler(5));
                        }
                    }
                }
                GateOp::Cp(c, t, _) => {
                    let label = boxed("P");
                    let width = label.chars().count();
                    for (i, line) in lines.iter_mut().enumerate() {
                        if i == *c {
                            line.push_str("──∙──");
                        } else if i == *t {
                            line.push_str(&label);
                        } else {
                            line.push_str(&filler(width));
                        }
                    }
                }
                GateOp::Measure(t) => {
                    let label = boxed("M");
                    let width = label.chars().count();
                    for (i, line) in lines.iter_mut().enumerate() {
                        if i == *t {
                            line.push_str(&label);
                        } else {
                            line.push_str(&filler(width));
                        }
                    }
                }
                // Whole-register columns.
                GateOp::PhaseFlip(_) => {
                    for line in lines.iter_mut() {
                        line.push_str("─[O]─");
                    }
                }
                GateOp::Diffusion => {
                    for line in lines.iter_mut() {
                        line.push_str("─[D]─");
                    }
                }
                GateOp::Normalize => {
                    for line in lines.iter_mut() {
                        line.push_str("─[N]─");
                    }
                }
                GateOp::Barrier => {
                    for line in lines.iter_mut() {
                        line.push_str("─░─");
                    }
                }
            }
        }

        for line in &lines {
            writeln!(f, "{}─", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_lane_per_qubit() {
        let mut circuit = Circuit::new(3);
        circuit.h(0).cnot(0, 2).barrier().measure(1);

        let rendered = HorizontalRenderer::new(&circuit).export();
        let lanes: Vec<&str> = rendered.lines().collect();
        assert_eq!(lanes.len(), 3);
        assert!(lanes[0].contains("[H]"));
        assert!(lanes[0].contains('∙'));
        assert!(lanes[2].contains('⊕'));
        assert!(lanes[1].contains("[M]"));
        assert!(lanes.iter().all(|l| l.contains('░')));
    }

    #[test]
    fn lanes_stay_equally_wide() {
        let mut circuit = Circuit::new(2);
        circuit.h(0).x(1).cp(0, 1, 1.0).diffusion();

        let rendered = HorizontalRenderer::new(&circuit).export();
        let widths: Vec<usize> = rendered
            .lines()
            .map(|l| l.chars().count())
            .collect();
        assert_eq!(widths[0], widths[1]);
    }

    #[test]
    fn empty_circuit_renders_bare_wires() {
        let circuit = Circuit::new(2);
        let rendered = HorizontalRenderer::new(&circuit).export();
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.contains("q0"));
        assert!(rendered.contains("───"));
    }
}
