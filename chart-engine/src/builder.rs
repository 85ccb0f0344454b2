//! FILENAME: chart-engine/src/builder.rs
//! The projection from result tree to chart.
//!
//! One dimension maps to a plain bar chart: one bar group per member,
//! one dataset per charted measure. Two dimensions map to a grouped or
//! stacked bar chart: the first dimension gives the x-axis categories,
//! the second gives the datasets. Combinations absent from the tree plot
//! as 0.0, mirroring the sparse-as-zero policy of the table projection.

use result_model::{Tree, Value};
use value_format::FormatterChain;
use crate::chart::{Chart, ChartError, ChartKind, Dataset};
use crate::color::ColorDispenser;

/// A measure selected for charting.
#[derive(Debug, Clone)]
struct ChartedMeasure {
    key: String,
    label: String,
    unit: Option<String>,
}

/// Builds one chart from one tree, then is discarded.
pub struct ChartBuilder<'a> {
    tree: &'a Tree,
    kind: ChartKind,
    chain: FormatterChain,
}

/// Convenience entry point with the standard formatter chain.
pub fn build_chart(tree: &Tree, kind: ChartKind) -> Result<Chart, ChartError> {
    ChartBuilder::new(tree, kind).build()
}

impl<'a> ChartBuilder<'a> {
    pub fn new(tree: &'a Tree, kind: ChartKind) -> Self {
        ChartBuilder {
            tree,
            kind,
            chain: FormatterChain::standard(),
        }
    }

    pub fn with_chain(mut self, chain: FormatterChain) -> Self {
        self.chain = chain;
        self
    }

    pub fn build(self) -> Result<Chart, ChartError> {
        let leaves = self.tree.leaf_rows();
        if leaves.is_empty() {
            return Err(ChartError::UnsupportedData(
                "result contains no data".to_string(),
            ));
        }

        let depth = self.tree.depth();
        if let Some(leaf) = leaves.iter().find(|l| l.path.len() != depth) {
            return Err(ChartError::UnsupportedData(format!(
                "leaf at depth {} in a result grouped by {} dimensions",
                leaf.path.len(),
                depth
            )));
        }

        let kind = match (self.kind, depth) {
            (ChartKind::Auto, 1) => ChartKind::Bar,
            (ChartKind::Auto, 2) => ChartKind::GroupedBar,
            (ChartKind::Auto, n) => {
                return Err(ChartError::UnsupportedData(format!(
                    "no chart shape fits a {}-dimensional result",
                    n
                )))
            }
            (ChartKind::Bar, 1) => ChartKind::Bar,
            (ChartKind::GroupedBar, 2) => ChartKind::GroupedBar,
            (ChartKind::StackedBar, 2) => ChartKind::StackedBar,
            (requested, n) => {
                return Err(ChartError::UnsupportedData(format!(
                    "{:?} chart cannot plot a {}-dimensional result",
                    requested, n
                )))
            }
        };

        let measures = self.charted_measures(&leaves)?;

        match kind {
            ChartKind::Bar => self.build_bar(&leaves, &measures),
            _ => self.build_grouped(&leaves, &measures, kind),
        }
    }

    /// Selects the measures plotted on the shared y-axis: every measure
    /// carrying the same unit as the first one seen. Mixed-unit results
    /// chart the first unit group only.
    fn charted_measures(
        &self,
        leaves: &[result_model::LeafRow],
    ) -> Result<Vec<ChartedMeasure>, ChartError> {
        let mut found: Vec<ChartedMeasure> = Vec::new();
        for leaf in leaves {
            for m in &leaf.measures {
                if !found.iter().any(|f| f.key == m.key) {
                    found.push(ChartedMeasure {
                        key: m.key.clone(),
                        label: m.label.clone(),
                        unit: m.unit.clone(),
                    });
                }
            }
        }
        let Some(first) = found.first() else {
            return Err(ChartError::UnsupportedData(
                "result carries no measures".to_string(),
            ));
        };
        let unit = first.unit.clone();
        found.retain(|m| m.unit == unit);
        Ok(found)
    }

    /// One dimension: members on the x-axis, one dataset per measure.
    fn build_bar(
        &self,
        leaves: &[result_model::LeafRow],
        measures: &[ChartedMeasure],
    ) -> Result<Chart, ChartError> {
        let mut members: Vec<Value> = Vec::new();
        for leaf in leaves {
            let member = &leaf.path[0].member;
            if !members.contains(member) {
                members.push(member.clone());
            }
        }

        let labels: Vec<String> = members.iter().map(|m| self.chain.to_text(m)).collect();

        let mut colors = ColorDispenser::new();
        let mut datasets = Vec::with_capacity(measures.len());
        for m in measures {
            let mut data = vec![0.0; members.len()];
            for leaf in leaves {
                let Some(measure) = leaf.measure(&m.key) else {
                    continue;
                };
                if let Some(i) = members.iter().position(|v| v == &leaf.path[0].member) {
                    data[i] = self.chain.to_number(&measure.value)?;
                }
            }
            datasets.push(Dataset {
                label: m.label.clone(),
                data,
                color: colors.next(),
            });
        }

        Ok(Chart {
            kind: ChartKind::Bar,
            labels,
            datasets,
            x_title: self.tree.dimensions[0].label.clone(),
            y_title: y_title(measures),
        })
    }

    /// Two dimensions: the first on the x-axis, the second as datasets.
    /// Only the first charted measure is plotted.
    fn build_grouped(
        &self,
        leaves: &[result_model::LeafRow],
        measures: &[ChartedMeasure],
        kind: ChartKind,
    ) -> Result<Chart, ChartError> {
        let measure = &measures[0];

        // First-seen unions of both dimensions, like the table axes.
        let mut categories: Vec<Value> = Vec::new();
        let mut series: Vec<Value> = Vec::new();
        for leaf in leaves {
            if !categories.contains(&leaf.path[0].member) {
                categories.push(leaf.path[0].member.clone());
            }
            if !series.contains(&leaf.path[1].member) {
                series.push(leaf.path[1].member.clone());
            }
        }

        let mut matrix = vec![vec![0.0; categories.len()]; series.len()];
        for leaf in leaves {
            let Some(m) = leaf.measure(&measure.key) else {
                continue;
            };
            let row = series
                .iter()
                .position(|v| v == &leaf.path[1].member)
                .unwrap_or(0);
            let col = categories
                .iter()
                .position(|v| v == &leaf.path[0].member)
                .unwrap_or(0);
            matrix[row][col] = self.chain.to_number(&m.value)?;
        }

        let labels: Vec<String> = categories.iter().map(|v| self.chain.to_text(v)).collect();

        let mut colors = ColorDispenser::new();
        let datasets: Vec<Dataset> = series
            .iter()
            .zip(matrix)
            .map(|(member, data)| Dataset {
                label: self.chain.to_text(member),
                data,
                color: colors.next(),
            })
            .collect();

        Ok(Chart {
            kind,
            labels,
            datasets,
            x_title: self.tree.dimensions[0].label.clone(),
            y_title: y_title(&measures[..1]),
        })
    }
}

/// Y-axis title: the measure label, with its unit when present; several
/// same-unit measures title by the unit alone.
fn y_title(measures: &[ChartedMeasure]) -> String {
    match measures {
        [only] => match &only.unit {
            Some(unit) => format!("{} ({})", only.label, unit),
            None => only.label.clone(),
        },
        _ => measures
            .first()
            .and_then(|m| m.unit.clone())
            .unwrap_or_else(|| "Value".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use result_model::{Dimension, Measure, TreeNode};

    fn sales(amount: f64) -> Measure {
        Measure::new("sales", "Sales", Value::number(amount)).with_unit("kr")
    }

    fn region_tree() -> Tree {
        Tree::new(
            vec![Dimension::new("region", "Region")],
            vec![
                TreeNode::leaf("north", Value::text("North"), "Region", vec![sales(300.0)]),
                TreeNode::leaf("south", Value::text("South"), "Region", vec![sales(120.0)]),
            ],
        )
    }

    fn region_quarter_tree() -> Tree {
        Tree::new(
            vec![
                Dimension::new("region", "Region"),
                Dimension::new("quarter", "Quarter"),
            ],
            vec![
                TreeNode::branch(
                    "north",
                    Value::text("North"),
                    "Region",
                    vec![
                        TreeNode::leaf("q1", Value::text("Q1"), "Quarter", vec![sales(100.0)]),
                        TreeNode::leaf("q2", Value::text("Q2"), "Quarter", vec![sales(150.0)]),
                    ],
                ),
                TreeNode::branch(
                    "south",
                    Value::text("South"),
                    "Region",
                    vec![TreeNode::leaf(
                        "q1",
                        Value::text("Q1"),
                        "Quarter",
                        vec![sales(200.0)],
                    )],
                ),
            ],
        )
    }

    #[test]
    fn test_auto_resolves_bar_for_one_dimension() {
        let chart = build_chart(&region_tree(), ChartKind::Auto).unwrap();

        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.labels, vec!["North", "South"]);
        assert_eq!(chart.datasets.len(), 1);
        assert_eq!(chart.datasets[0].data, vec![300.0, 120.0]);
        assert_eq!(chart.x_title, "Region");
        assert_eq!(chart.y_title, "Sales (kr)");
    }

    #[test]
    fn test_auto_resolves_grouped_bar_for_two_dimensions() {
        let chart = build_chart(&region_quarter_tree(), ChartKind::Auto).unwrap();

        assert_eq!(chart.kind, ChartKind::GroupedBar);
        assert_eq!(chart.labels, vec!["North", "South"]);

        // One dataset per quarter, first-seen order.
        assert_eq!(chart.datasets.len(), 2);
        assert_eq!(chart.datasets[0].label, "Q1");
        assert_eq!(chart.datasets[0].data, vec![100.0, 200.0]);

        // South has no Q2: plotted as zero, dataset lengths stay aligned.
        assert_eq!(chart.datasets[1].label, "Q2");
        assert_eq!(chart.datasets[1].data, vec![150.0, 0.0]);
    }

    #[test]
    fn test_stacked_bar_keeps_requested_kind() {
        let chart = build_chart(&region_quarter_tree(), ChartKind::StackedBar).unwrap();
        assert_eq!(chart.kind, ChartKind::StackedBar);
        assert_eq!(chart.datasets[1].data, vec![150.0, 0.0]);
    }

    #[test]
    fn test_empty_result_is_rejected() {
        let tree = Tree::new(vec![Dimension::new("region", "Region")], vec![]);
        let err = build_chart(&tree, ChartKind::Auto).unwrap_err();
        assert!(matches!(err, ChartError::UnsupportedData(_)));
    }

    #[test]
    fn test_three_dimensions_have_no_auto_shape() {
        let tree = Tree::new(
            vec![
                Dimension::new("a", "A"),
                Dimension::new("b", "B"),
                Dimension::new("c", "C"),
            ],
            vec![TreeNode::branch(
                "x",
                Value::text("X"),
                "A",
                vec![TreeNode::branch(
                    "y",
                    Value::text("Y"),
                    "B",
                    vec![TreeNode::leaf("z", Value::text("Z"), "C", vec![sales(1.0)])],
                )],
            )],
        );
        let err = build_chart(&tree, ChartKind::Auto).unwrap_err();
        assert!(matches!(err, ChartError::UnsupportedData(_)));
    }

    #[test]
    fn test_ragged_leaf_is_rejected() {
        // Two declared dimensions, but one branch bottoms out a level
        // early; the series assignment has no member for it.
        let mut tree = region_quarter_tree();
        tree.roots
            .push(TreeNode::leaf("west", Value::text("West"), "Region", vec![sales(50.0)]));

        let err = build_chart(&tree, ChartKind::Auto).unwrap_err();
        assert!(matches!(err, ChartError::UnsupportedData(_)));
    }

    #[test]
    fn test_grouped_bar_needs_two_dimensions() {
        let err = build_chart(&region_tree(), ChartKind::GroupedBar).unwrap_err();
        assert!(matches!(err, ChartError::UnsupportedData(_)));
    }

    #[test]
    fn test_measures_sharing_a_unit_plot_together() {
        let mut tree = region_tree();
        for leaf in &mut tree.roots {
            leaf.measures.push(
                Measure::new("profit", "Profit", Value::number(40.0)).with_unit("kr"),
            );
        }

        let chart = build_chart(&tree, ChartKind::Auto).unwrap();
        assert_eq!(chart.kind, ChartKind::Bar);

        // Both kr measures share the axis, one dataset each.
        assert_eq!(chart.datasets.len(), 2);
        assert_eq!(chart.datasets[0].label, "Sales");
        assert_eq!(chart.datasets[1].label, "Profit");
        assert_eq!(chart.datasets[1].data, vec![40.0, 40.0]);

        // Several measures title the axis by their common unit.
        assert_eq!(chart.y_title, "kr");
    }

    #[test]
    fn test_mixed_units_chart_first_unit_group() {
        let mut tree = region_tree();
        for leaf in &mut tree.roots {
            leaf.measures
                .push(Measure::new("count", "Count", Value::number(5.0)));
        }

        let chart = build_chart(&tree, ChartKind::Auto).unwrap();
        // "count" has no unit and is left off the kr axis.
        assert_eq!(chart.datasets.len(), 1);
        assert_eq!(chart.datasets[0].label, "Sales");
    }

    #[test]
    fn test_non_numeric_measure_fails_conversion() {
        let tree = Tree::new(
            vec![Dimension::new("region", "Region")],
            vec![TreeNode::leaf(
                "north",
                Value::text("North"),
                "Region",
                vec![Measure::new("status", "Status", Value::text("open"))],
            )],
        );
        let err = build_chart(&tree, ChartKind::Auto).unwrap_err();
        assert!(matches!(err, ChartError::Format(_)));
    }

    #[test]
    fn test_colors_are_stable_across_builds() {
        let first = build_chart(&region_quarter_tree(), ChartKind::Auto).unwrap();
        let second = build_chart(&region_quarter_tree(), ChartKind::Auto).unwrap();
        assert_eq!(first, second);
        assert_ne!(first.datasets[0].color, first.datasets[1].color);
    }
}
