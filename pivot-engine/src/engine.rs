//! FILENAME: pivot-engine/src/engine.rs
//! Pivot Engine - projects the result tree onto the 2-D table model.
//!
//! Algorithm:
//! 1. Partition the dimension list into row and column axes per the request
//! 2. Flatten the tree and re-key every leaf by (row path, column path),
//!    expanding the `@values` sentinel into one entry per selected measure
//! 3. Union the paths of each axis and regroup them hierarchically: outer
//!    levels first, groups in first-seen order, so contiguous equal
//!    prefixes merge into header spans
//! 4. Emit one body row per distinct row path; intersections absent from
//!    the data become zero cells so the grid is always rectangular
//! 5. Optionally append a grand-total footer row
//!
//! The whole build is a pure in-memory transformation: no I/O, no shared
//! mutable state across passes. The wrapper factory lives exactly as long
//! as one builder.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use result_model::{LeafRow, Tree, Value, WrapperFactory};
use crate::definition::{PivotRequest, VALUES_KEY};
use crate::error::PivotError;
use crate::table::{Cell, CellContent, Row, Section, Table};

// ============================================================================
// AXIS STRUCTURES
// ============================================================================

/// One slot of an axis: a real dimension (by position in the tree's
/// dimension list) or the `@values` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisSlot {
    Dimension(usize),
    Values,
}

/// A resolved measure selected for the build.
#[derive(Debug, Clone)]
struct MeasureInfo {
    key: String,
    label: String,
    unit: Option<String>,
}

/// One step of a row or column path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PathKey {
    /// A dimension member at a given axis level.
    Member { dimension: usize, member: Value },
    /// A selected measure (index into the resolved measure list).
    Measure { index: usize },
}

type AxisPath = SmallVec<[PathKey; 4]>;

/// Insertion-ordered set of axis paths.
#[derive(Debug, Default)]
struct PathOrder {
    paths: Vec<AxisPath>,
    seen: FxHashSet<AxisPath>,
}

impl PathOrder {
    /// Records a path the first time it is seen.
    fn insert(&mut self, path: &AxisPath) {
        if self.seen.insert(path.clone()) {
            self.paths.push(path.clone());
        }
    }
}

/// Regroups a path union hierarchically: paths sharing a key at `level`
/// become contiguous, groups ordered by first appearance, original order
/// kept inside each group. Leaf iteration emits paths in tree order,
/// which interleaves an axis whose outer level is not the tree's outer
/// dimension (or is `@values`); this restores contiguous header runs.
fn regroup(paths: Vec<AxisPath>, level: usize) -> Vec<AxisPath> {
    if paths.len() <= 1 || paths.first().map_or(true, |p| level >= p.len()) {
        return paths;
    }
    let mut groups: Vec<(PathKey, Vec<AxisPath>)> = Vec::new();
    for path in paths {
        let key = path[level].clone();
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.push(path),
            None => groups.push((key, vec![path])),
        }
    }
    groups
        .into_iter()
        .flat_map(|(_, group)| regroup(group, level + 1))
        .collect()
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builds one `Table` from one tree and one request, then is discarded.
pub struct PivotBuilder<'a> {
    tree: &'a Tree,
    request: &'a PivotRequest,
    factory: WrapperFactory,
}

/// Convenience entry point: one build, one table.
pub fn pivot_table(tree: &Tree, request: &PivotRequest) -> Result<Table, PivotError> {
    PivotBuilder::new(tree, request).build()
}

impl<'a> PivotBuilder<'a> {
    pub fn new(tree: &'a Tree, request: &'a PivotRequest) -> Self {
        PivotBuilder {
            tree,
            request,
            factory: WrapperFactory::new(),
        }
    }

    /// Executes the full projection.
    pub fn build(mut self) -> Result<Table, PivotError> {
        let leaves = self.tree.leaf_rows();
        let measures = self.resolve_measures(&leaves)?;
        let (row_slots, col_slots) = self.partition_axes(&measures)?;

        // Step 2: accumulate cell values and the first-seen path unions.
        let mut row_order = PathOrder::default();
        let mut col_order = PathOrder::default();
        let mut cells: FxHashMap<(AxisPath, AxisPath), Value> = FxHashMap::default();

        let depth = self.tree.depth();
        for leaf in &leaves {
            if leaf.path.len() != depth {
                return Err(PivotError::UnsupportedData(format!(
                    "leaf at depth {} in a result grouped by {} dimensions",
                    leaf.path.len(),
                    depth
                )));
            }
            for (m_idx, m) in measures.iter().enumerate() {
                let Some(measure) = leaf.measure(&m.key) else {
                    continue;
                };
                let row_path = build_axis_path(&row_slots, leaf, m_idx);
                let col_path = build_axis_path(&col_slots, leaf, m_idx);
                row_order.insert(&row_path);
                col_order.insert(&col_path);
                cells.insert((row_path, col_path), measure.value.clone());
            }
        }

        // Step 3: hierarchical regrouping of both unions.
        let row_paths = regroup(row_order.paths, 0);
        let col_paths = regroup(col_order.paths, 0);

        let row_index: FxHashMap<&AxisPath, usize> =
            row_paths.iter().enumerate().map(|(i, p)| (p, i)).collect();
        let col_index: FxHashMap<&AxisPath, usize> =
            col_paths.iter().enumerate().map(|(i, p)| (p, i)).collect();

        let mut grid: FxHashMap<(usize, usize), Value> = FxHashMap::default();
        for ((row_path, col_path), value) in cells {
            if let (Some(&r), Some(&c)) = (row_index.get(&row_path), col_index.get(&col_path)) {
                grid.insert((r, c), value);
            }
        }

        // Which measure fills a given column (when `@values` is on the
        // column axis) or row (when it is on the row axis).
        let col_measures: Vec<Option<usize>> = col_paths.iter().map(path_measure).collect();
        let row_measures: Vec<Option<usize>> = row_paths.iter().map(path_measure).collect();

        let row_label_cols = row_slots.len();
        let leaf_cols = col_paths.len();

        let header = self.build_header(&row_slots, &col_slots, &col_paths, &measures);
        let body = self.build_body(
            &row_slots,
            &row_paths,
            &col_paths,
            &grid,
            &col_measures,
            &row_measures,
            &measures,
        );
        let footer = if self.request.totals {
            self.build_footer(
                row_label_cols,
                &row_paths,
                &col_paths,
                &grid,
                &col_measures,
                &measures,
            )
        } else {
            Section::default()
        };

        Table::new(header, body, footer, row_label_cols, leaf_cols)
    }

    // ========================================================================
    // MEASURE RESOLUTION AND AXIS PARTITIONING
    // ========================================================================

    /// Collects the selected measures: the caller's explicit list, or every
    /// measure present in the result in first-seen order.
    fn resolve_measures(&self, leaves: &[LeafRow]) -> Result<Vec<MeasureInfo>, PivotError> {
        let mut found: Vec<MeasureInfo> = Vec::new();
        for leaf in leaves {
            for m in &leaf.measures {
                if !found.iter().any(|f| f.key == m.key) {
                    found.push(MeasureInfo {
                        key: m.key.clone(),
                        label: m.label.clone(),
                        unit: m.unit.clone(),
                    });
                }
            }
        }

        if self.request.measures.is_empty() {
            return Ok(found);
        }

        let mut selected = Vec::with_capacity(self.request.measures.len());
        for key in &self.request.measures {
            let Some(info) = found.iter().find(|f| &f.key == key) else {
                return Err(PivotError::UnsupportedData(format!(
                    "measure '{}' is not present in the result",
                    key
                )));
            };
            selected.push(info.clone());
        }
        Ok(selected)
    }

    /// Splits the dimension list into row and column axes, placing the
    /// `@values` sentinel. Caller order is preserved within each axis.
    fn partition_axes(
        &self,
        measures: &[MeasureInfo],
    ) -> Result<(Vec<AxisSlot>, Vec<AxisSlot>), PivotError> {
        let dim_pos: FxHashMap<&str, usize> = self
            .tree
            .dimensions
            .iter()
            .enumerate()
            .map(|(i, d)| (d.key.as_str(), i))
            .collect();

        let col_slots = resolve_axis(&self.request.columns, &dim_pos, "columns")?;

        let row_slots = if self.request.rows.is_empty() {
            // Derived: every dimension not pivoted to columns, tree order.
            self.tree
                .dimensions
                .iter()
                .enumerate()
                .filter(|(i, _)| !col_slots.contains(&AxisSlot::Dimension(*i)))
                .map(|(i, _)| AxisSlot::Dimension(i))
                .collect()
        } else {
            let slots = resolve_axis(&self.request.rows, &dim_pos, "rows")?;
            for slot in &slots {
                if *slot != AxisSlot::Values && col_slots.contains(slot) {
                    return Err(PivotError::InvalidSpecification(
                        "a dimension is assigned to both axes".to_string(),
                    ));
                }
            }
            let assigned = slots.len() + col_slots.len()
                - slots.iter().filter(|s| **s == AxisSlot::Values).count()
                - col_slots.iter().filter(|s| **s == AxisSlot::Values).count();
            if assigned != self.tree.dimensions.len() {
                return Err(PivotError::InvalidSpecification(
                    "rows and columns together must cover every grouped dimension".to_string(),
                ));
            }
            slots
        };

        let values_in_rows = row_slots.contains(&AxisSlot::Values);
        let values_in_cols = col_slots.contains(&AxisSlot::Values);
        if values_in_rows && values_in_cols {
            return Err(PivotError::InvalidSpecification(
                "@values cannot be assigned to both axes".to_string(),
            ));
        }

        let mut col_slots = col_slots;
        if !values_in_rows && !values_in_cols {
            if measures.len() > 1 {
                return Err(PivotError::UnsupportedData(format!(
                    "{} measures selected but @values is assigned to no axis",
                    measures.len()
                )));
            }
            // A single measure slots in as the innermost column level.
            col_slots.push(AxisSlot::Values);
        }

        Ok((row_slots, col_slots))
    }

    // ========================================================================
    // SECTION CONSTRUCTION
    // ========================================================================

    /// One header row per column-axis level; contiguous equal path
    /// prefixes merge into col-spans. The first header row additionally
    /// carries the row-axis dimension labels, spanning all header rows.
    fn build_header(
        &mut self,
        row_slots: &[AxisSlot],
        col_slots: &[AxisSlot],
        col_paths: &[AxisPath],
        measures: &[MeasureInfo],
    ) -> Section {
        let mut header = Section::default();
        let header_rows = col_slots.len().max(1);

        for level in 0..header_rows {
            let mut row = Row::new();

            if level == 0 {
                for slot in row_slots {
                    let text = self.slot_label(*slot);
                    let cell = Cell::header(CellContent::Label(self.factory.label(&text)))
                        .with_row_span(header_rows as u16);
                    row.push(cell);
                }
            }

            if col_slots.is_empty() {
                // All measures stacked on the row axis: a single blank
                // header cell tops the lone data column (if any).
                for _ in 0..col_paths.len() {
                    row.push(Cell::header(CellContent::Label(self.factory.label(""))));
                }
            } else {
                let mut i = 0;
                while i < col_paths.len() {
                    let mut j = i + 1;
                    while j < col_paths.len()
                        && col_paths[j][..=level] == col_paths[i][..=level]
                    {
                        j += 1;
                    }
                    let content = self.path_key_content(&col_paths[i][level], measures);
                    row.push(Cell::header(content).with_col_span((j - i) as u16));
                    i = j;
                }
            }

            header.rows.push(row);
        }

        header
    }

    /// One body row per distinct row path: merged member header cells on
    /// the left, then one data cell per unioned column path. Absent
    /// intersections are zero cells, never holes.
    #[allow(clippy::too_many_arguments)]
    fn build_body(
        &mut self,
        row_slots: &[AxisSlot],
        row_paths: &[AxisPath],
        col_paths: &[AxisPath],
        cells: &FxHashMap<(usize, usize), Value>,
        col_measures: &[Option<usize>],
        row_measures: &[Option<usize>],
        measures: &[MeasureInfo],
    ) -> Section {
        let mut body = Section::default();
        let zero = Value::number(0.0);

        for (r, row_path) in row_paths.iter().enumerate() {
            let mut row = Row::new();

            // Row-axis member cells, merged vertically over runs of equal
            // path prefixes.
            for level in 0..row_slots.len() {
                let starts_run =
                    r == 0 || row_paths[r - 1][..=level] != row_path[..=level];
                if !starts_run {
                    continue;
                }
                let mut span = 1;
                while r + span < row_paths.len()
                    && row_paths[r + span][..=level] == row_path[..=level]
                {
                    span += 1;
                }
                let content = self.path_key_content(&row_path[level], measures);
                row.push(Cell::header(content).with_row_span(span as u16));
            }

            for c in 0..col_paths.len() {
                let m_idx = col_measures[c].or(row_measures[r]).unwrap_or(0);
                let info = &measures[m_idx];
                let value = cells.get(&(r, c)).unwrap_or(&zero);
                let wrapper = self.factory.value(&info.key, info.unit.as_deref(), value);
                row.push(Cell::data(CellContent::Value(wrapper)));
            }

            body.rows.push(row);
        }

        body
    }

    /// Grand-total footer: one numeric sum per leaf column.
    fn build_footer(
        &mut self,
        row_label_cols: usize,
        row_paths: &[AxisPath],
        col_paths: &[AxisPath],
        cells: &FxHashMap<(usize, usize), Value>,
        col_measures: &[Option<usize>],
        measures: &[MeasureInfo],
    ) -> Section {
        let mut footer = Section::default();
        let mut row = Row::new();

        if row_label_cols > 0 {
            let label = self.factory.label("Grand Total");
            row.push(Cell::footer(CellContent::Label(label)).with_col_span(row_label_cols as u16));
        }

        for c in 0..col_paths.len() {
            let mut sum = 0.0;
            for r in 0..row_paths.len() {
                if let Some(value) = cells.get(&(r, c)) {
                    if let Some(n) = value.as_number() {
                        sum += n;
                    }
                }
            }
            let m_idx = col_measures[c].unwrap_or(0);
            let info = measures.get(m_idx);
            let key = info.map(|i| i.key.as_str()).unwrap_or("total");
            let unit = info.and_then(|i| i.unit.as_deref());
            let wrapper = self.factory.value(key, unit, &Value::number(sum));
            row.push(Cell::footer(CellContent::Value(wrapper)));
        }

        if !row.cells.is_empty() {
            footer.rows.push(row);
        }
        footer
    }

    // ========================================================================
    // CONTENT HELPERS
    // ========================================================================

    fn slot_label(&self, slot: AxisSlot) -> String {
        match slot {
            AxisSlot::Dimension(i) => self.tree.dimensions[i].label.clone(),
            AxisSlot::Values => "Values".to_string(),
        }
    }

    fn path_key_content(&mut self, key: &PathKey, measures: &[MeasureInfo]) -> CellContent {
        match key {
            PathKey::Member { member, .. } => CellContent::Member(self.factory.member(member)),
            PathKey::Measure { index } => {
                CellContent::Label(self.factory.label(&measures[*index].label))
            }
        }
    }
}

/// Projects one leaf onto one axis: its members at the axis' dimension
/// levels, with the measure spliced in at the `@values` slot.
fn build_axis_path(slots: &[AxisSlot], leaf: &LeafRow, measure_index: usize) -> AxisPath {
    let mut path = AxisPath::new();
    for slot in slots {
        match slot {
            AxisSlot::Dimension(pos) => path.push(PathKey::Member {
                dimension: *pos,
                member: leaf.path[*pos].member.clone(),
            }),
            AxisSlot::Values => path.push(PathKey::Measure {
                index: measure_index,
            }),
        }
    }
    path
}

/// The measure index carried by a path, if `@values` sits on that axis.
fn path_measure(path: &AxisPath) -> Option<usize> {
    path.iter().find_map(|k| match k {
        PathKey::Measure { index } => Some(*index),
        _ => None,
    })
}

/// Maps requested axis keys onto slots, rejecting unknown dimensions and
/// duplicates within one axis.
fn resolve_axis(
    keys: &[String],
    dim_pos: &FxHashMap<&str, usize>,
    axis: &str,
) -> Result<Vec<AxisSlot>, PivotError> {
    let mut slots = Vec::with_capacity(keys.len());
    for key in keys {
        let slot = if key == VALUES_KEY {
            AxisSlot::Values
        } else {
            match dim_pos.get(key.as_str()) {
                Some(&pos) => AxisSlot::Dimension(pos),
                None => {
                    return Err(PivotError::InvalidSpecification(format!(
                        "dimension '{}' does not exist in the result ({} axis)",
                        key, axis
                    )))
                }
            }
        };
        if slots.contains(&slot) {
            return Err(PivotError::InvalidSpecification(format!(
                "dimension '{}' appears twice on the {} axis",
                key, axis
            )));
        }
        slots.push(slot);
    }
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use result_model::{Dimension, Measure, TreeNode};
    use crate::table::CellKind;

    fn measure(key: &str, label: &str, amount: f64) -> Measure {
        Measure::new(key, label, Value::number(amount))
    }

    /// Region x Quarter tree; South has no Q2 branch (sparse).
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
                        TreeNode::leaf(
                            "q1",
                            Value::text("Q1"),
                            "Quarter",
                            vec![measure("sales", "Sales", 100.0)],
                        ),
                        TreeNode::leaf(
                            "q2",
                            Value::text("Q2"),
                            "Quarter",
                            vec![measure("sales", "Sales", 150.0)],
                        ),
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
                        vec![measure("sales", "Sales", 200.0)],
                    )],
                ),
            ],
        )
    }

    fn single_dimension_tree() -> Tree {
        Tree::new(
            vec![Dimension::new("region", "Region")],
            vec![
                TreeNode::leaf(
                    "north",
                    Value::text("North"),
                    "Region",
                    vec![measure("sales", "Sales", 300.0)],
                ),
                TreeNode::leaf(
                    "south",
                    Value::text("South"),
                    "Region",
                    vec![measure("sales", "Sales", 120.0)],
                ),
            ],
        )
    }

    fn data_value(cell: &Cell) -> Value {
        match &cell.content {
            CellContent::Value(v) => v.value.clone(),
            other => panic!("expected a value cell, got {:?}", other),
        }
    }

    fn header_text(cell: &Cell) -> String {
        match &cell.content {
            CellContent::Label(l) => l.text.clone(),
            CellContent::Member(m) => m.display.clone(),
            CellContent::Value(v) => panic!("expected header content, got value {:?}", v),
        }
    }

    #[test]
    fn test_single_dimension_rows_only() {
        // rows=[Region], columns=[], one measure.
        let tree = single_dimension_tree();
        let request = PivotRequest::columns(vec![]);
        let table = pivot_table(&tree, &request).unwrap();

        assert_eq!(table.row_label_cols, 1);
        assert_eq!(table.leaf_cols, 1);
        assert_eq!(table.body.rows.len(), 2);

        // Implicitly placed @values shows the measure label in the header.
        assert_eq!(header_text(&table.header.rows[0].cells[1]), "Sales");

        assert_eq!(header_text(&table.body.rows[0].cells[0]), "North");
        assert_eq!(data_value(&table.body.rows[0].cells[1]), Value::number(300.0));
        assert_eq!(header_text(&table.body.rows[1].cells[0]), "South");
        assert_eq!(data_value(&table.body.rows[1].cells[1]), Value::number(120.0));
    }

    #[test]
    fn test_sparse_column_renders_zero() {
        // rows=[Region], columns=[Quarter]; South has no Q2 data.
        let tree = region_quarter_tree();
        let request = PivotRequest::columns(vec!["quarter".to_string()]);
        let table = pivot_table(&tree, &request).unwrap();

        assert_eq!(table.leaf_cols, 2);
        let quarters = &table.header.rows[0];
        assert_eq!(header_text(&quarters.cells[1]), "Q1");
        assert_eq!(header_text(&quarters.cells[2]), "Q2");

        let south = &table.body.rows[1];
        assert_eq!(header_text(&south.cells[0]), "South");
        assert_eq!(data_value(&south.cells[1]), Value::number(200.0));
        // Sparse intersection: a zero cell, not a hole.
        assert_eq!(data_value(&south.cells[2]), Value::number(0.0));
    }

    #[test]
    fn test_rectangularity_and_tiling() {
        let tree = region_quarter_tree();
        let request = PivotRequest::columns(vec!["quarter".to_string()]);
        let table = pivot_table(&tree, &request).unwrap();

        // Every body row carries the same number of data cells.
        for row in &table.body.rows {
            let data_cells = row
                .cells
                .iter()
                .filter(|c| c.kind == CellKind::Data)
                .count();
            assert_eq!(data_cells, table.leaf_cols);
        }

        // Span tiling is checked at construction; re-check explicitly.
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_multiple_measures_side_by_side() {
        // @values on the column axis: measures laid out side by side
        // under each quarter.
        let mut tree = region_quarter_tree();
        for root in &mut tree.roots {
            for leaf in &mut root.children {
                leaf.measures.push(measure("count", "Count", 2.0));
            }
        }

        let request =
            PivotRequest::columns(vec!["quarter".to_string(), VALUES_KEY.to_string()]);
        let table = pivot_table(&tree, &request).unwrap();

        assert_eq!(table.leaf_cols, 4);
        assert_eq!(table.header.rows.len(), 2);

        // Quarter header cells span both measures.
        let quarters = &table.header.rows[0];
        assert_eq!(quarters.cells[1].col_span, 2);
        assert_eq!(header_text(&quarters.cells[1]), "Q1");

        let labels = &table.header.rows[1];
        assert_eq!(header_text(&labels.cells[0]), "Sales");
        assert_eq!(header_text(&labels.cells[1]), "Count");

        // South/Q2 has neither measure: both cells are zero.
        let south = &table.body.rows[1];
        assert_eq!(data_value(&south.cells[3]), Value::number(0.0));
        assert_eq!(data_value(&south.cells[4]), Value::number(0.0));
    }

    #[test]
    fn test_values_stacked_on_rows() {
        let mut tree = region_quarter_tree();
        for root in &mut tree.roots {
            for leaf in &mut root.children {
                leaf.measures.push(measure("count", "Count", 2.0));
            }
        }

        let request = PivotRequest::columns(vec!["quarter".to_string()])
            .with_rows(vec!["region".to_string(), VALUES_KEY.to_string()]);
        let table = pivot_table(&tree, &request).unwrap();

        // One row per (region, measure) combination.
        assert_eq!(table.body.rows.len(), 4);
        assert_eq!(table.row_label_cols, 2);

        // The region cell merges over its two measure rows.
        let north = &table.body.rows[0];
        assert_eq!(header_text(&north.cells[0]), "North");
        assert_eq!(north.cells[0].row_span, 2);
        assert_eq!(header_text(&north.cells[1]), "Sales");

        // Second row starts with the measure label only.
        let north_count = &table.body.rows[1];
        assert_eq!(header_text(&north_count.cells[0]), "Count");
    }

    #[test]
    fn test_pivoted_measure_order_outer() {
        // @values placed OUTSIDE the quarter level: measure blocks first.
        let mut tree = region_quarter_tree();
        for root in &mut tree.roots {
            for leaf in &mut root.children {
                leaf.measures.push(measure("count", "Count", 2.0));
            }
        }

        let request =
            PivotRequest::columns(vec![VALUES_KEY.to_string(), "quarter".to_string()]);
        let table = pivot_table(&tree, &request).unwrap();

        // Each measure block stays contiguous and spans its quarters.
        let outer = &table.header.rows[0];
        assert_eq!(header_text(&outer.cells[1]), "Sales");
        assert_eq!(outer.cells[1].col_span, 2);
        assert_eq!(header_text(&outer.cells[2]), "Count");
        assert_eq!(outer.cells[2].col_span, 2);

        let inner: Vec<String> = table.header.rows[1]
            .cells
            .iter()
            .map(header_text)
            .collect();
        assert_eq!(inner, vec!["Q1", "Q2", "Q1", "Q2"]);

        // Sales/Q2 for South lands in the Sales block, not the Count one.
        let south = &table.body.rows[1];
        assert_eq!(data_value(&south.cells[1]), Value::number(200.0));
        assert_eq!(data_value(&south.cells[2]), Value::number(0.0));
    }

    #[test]
    fn test_reordered_row_axis_groups_members() {
        // Row order inverts the tree's nesting: quarters group regions.
        let tree = region_quarter_tree();
        let request = PivotRequest::columns(vec![])
            .with_rows(vec!["quarter".to_string(), "region".to_string()]);
        let table = pivot_table(&tree, &request).unwrap();

        assert_eq!(table.body.rows.len(), 3);

        // Q1's regions are contiguous under one merged quarter cell.
        let q1 = &table.body.rows[0];
        assert_eq!(header_text(&q1.cells[0]), "Q1");
        assert_eq!(q1.cells[0].row_span, 2);
        assert_eq!(header_text(&q1.cells[1]), "North");
        assert_eq!(header_text(&table.body.rows[1].cells[0]), "South");

        let q2 = &table.body.rows[2];
        assert_eq!(header_text(&q2.cells[0]), "Q2");
        assert_eq!(q2.cells[0].row_span, 1);
        assert_eq!(data_value(&q2.cells[2]), Value::number(150.0));
    }

    #[test]
    fn test_grand_total_footer() {
        let tree = region_quarter_tree();
        let request = PivotRequest::columns(vec!["quarter".to_string()]).with_totals(true);
        let table = pivot_table(&tree, &request).unwrap();

        assert_eq!(table.footer.rows.len(), 1);
        let footer = &table.footer.rows[0];
        assert_eq!(header_text(&footer.cells[0]), "Grand Total");
        assert_eq!(footer.cells[0].col_span, 1);
        assert_eq!(data_value(&footer.cells[1]), Value::number(300.0));
        assert_eq!(data_value(&footer.cells[2]), Value::number(150.0));
    }

    #[test]
    fn test_unknown_dimension_is_rejected() {
        let tree = region_quarter_tree();
        let request = PivotRequest::columns(vec!["month".to_string()]);
        let err = pivot_table(&tree, &request).unwrap_err();
        assert!(matches!(err, PivotError::InvalidSpecification(_)));
    }

    #[test]
    fn test_dimension_on_both_axes_is_rejected() {
        let tree = region_quarter_tree();
        let request = PivotRequest::columns(vec!["quarter".to_string()])
            .with_rows(vec!["quarter".to_string(), "region".to_string()]);
        let err = pivot_table(&tree, &request).unwrap_err();
        assert!(matches!(err, PivotError::InvalidSpecification(_)));
    }

    #[test]
    fn test_multiple_measures_need_values_axis() {
        let mut tree = region_quarter_tree();
        for root in &mut tree.roots {
            for leaf in &mut root.children {
                leaf.measures.push(measure("count", "Count", 2.0));
            }
        }

        let request = PivotRequest::columns(vec!["quarter".to_string()]);
        let err = pivot_table(&tree, &request).unwrap_err();
        assert!(matches!(err, PivotError::UnsupportedData(_)));
    }

    #[test]
    fn test_unknown_measure_is_rejected() {
        let tree = region_quarter_tree();
        let request = PivotRequest::columns(vec!["quarter".to_string()])
            .with_measures(vec!["profit".to_string()]);
        let err = pivot_table(&tree, &request).unwrap_err();
        assert!(matches!(err, PivotError::UnsupportedData(_)));
    }

    #[test]
    fn test_null_branch_contributes_nothing() {
        let mut tree = region_quarter_tree();
        tree.roots
            .insert(1, TreeNode::null("west", Value::text("West"), "Region"));

        let request = PivotRequest::columns(vec!["quarter".to_string()]);
        let table = pivot_table(&tree, &request).unwrap();

        assert_eq!(table.body.rows.len(), 2);
        assert!(table
            .body
            .rows
            .iter()
            .all(|r| header_text(&r.cells[0]) != "West"));
    }

    #[test]
    fn test_all_dimensions_pivoted() {
        // Both dimensions on the column axis: a single body row.
        let tree = region_quarter_tree();
        let request = PivotRequest::columns(vec![
            "region".to_string(),
            "quarter".to_string(),
            VALUES_KEY.to_string(),
        ]);
        let table = pivot_table(&tree, &request).unwrap();

        assert_eq!(table.row_label_cols, 0);
        assert_eq!(table.body.rows.len(), 1);
        assert_eq!(table.leaf_cols, 3);
        assert_eq!(table.header.rows.len(), 3);

        // Region header merges over its quarters.
        let outer = &table.header.rows[0];
        assert_eq!(header_text(&outer.cells[0]), "North");
        assert_eq!(outer.cells[0].col_span, 2);
    }
}
