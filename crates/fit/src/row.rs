use crate::cell::Cell;
use crate::table::FitTable;
use html::Id;

/// A content row: the cells of one `<tr>` plus its position among the content rows.
#[derive(Clone, Debug)]
pub struct Row {
    index: usize,
    node: Id,
    cells: Vec<Cell>,
}

impl Row {
    pub(crate) fn new(node: Id, cells: Vec<Cell>) -> Self {
        Row {
            index: 0,
            node,
            cells,
        }
    }

    /// Zero-based position among the table's content rows, kept current across insert/remove.
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn update_index(&mut self, index: usize) {
        self.index = index;
    }

    /// Id of the backing `<tr>`.
    pub fn node(&self) -> Id {
        self.node
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn cell(&self, column: usize) -> Option<&Cell> {
        self.cells.get(column)
    }

    pub fn cell_mut(&mut self, column: usize) -> Option<&mut Cell> {
        self.cells.get_mut(column)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub(crate) fn push_cell(&mut self, cell: Cell) -> &mut Cell {
        self.cells.push(cell);
        let last = self.cells.len() - 1;
        &mut self.cells[last]
    }
}

/// Handle to a row that was just inserted or appended. Cells added through it get
/// their `<td>` markup right away.
pub struct RowMut<'t, 'a> {
    table: &'t mut FitTable<'a>,
    index: usize,
}

impl<'t, 'a> RowMut<'t, 'a> {
    pub(crate) fn new(table: &'t mut FitTable<'a>, index: usize) -> Self {
        RowMut { table, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn row(&self) -> &Row {
        &self.table.rows()[self.index]
    }

    pub fn add_cell(&mut self, text: &str) -> &mut Cell {
        self.table.push_cell(self.index, text)
    }
}
