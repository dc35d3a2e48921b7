//! An open document: cell code plus its undo history.
//!
//! Every editing command performs its change and records how to revert and
//! repeat it. Undo and redo call the very same commands, which is why those
//! commands must record through the log they are given rather than through
//! the document.

use gridmodel_config::Settings;
use gridmodel_core::{AttrDelta, Coord, Key, ModelError, Result, Selection, Shape};
use log::debug;

use crate::code_array::CodeArray;
use crate::dict_grid::DictGrid;
use crate::unredo::{Command, UnRedo};

/// Argument of a recorded editing command.
#[derive(Debug, Clone, PartialEq)]
pub enum EditArg {
    Coord(Coord),
    Code(Option<String>),
    Shape(Shape),
    Selection(Selection),
    Attributes(AttrDelta),
    Text(String),
    Count(usize),
    Entries(Vec<(Coord, String)>),
}

pub type EditLog = UnRedo<CodeArray, EditArg>;
type EditCommand = Command<CodeArray, EditArg>;

fn invalid(command: &'static str, index: usize) -> ModelError {
    ModelError::InvalidEditArgument { command, index }
}

fn coord_arg<'a>(command: &'static str, args: &'a [EditArg], index: usize) -> Result<&'a Coord> {
    match args.get(index) {
        Some(EditArg::Coord(c)) => Ok(c),
        _ => Err(invalid(command, index)),
    }
}

fn count_arg(command: &'static str, args: &[EditArg], index: usize) -> Result<usize> {
    match args.get(index) {
        Some(EditArg::Count(n)) => Ok(*n),
        _ => Err(invalid(command, index)),
    }
}

fn shape_arg<'a>(command: &'static str, args: &'a [EditArg], index: usize) -> Result<&'a Shape> {
    match args.get(index) {
        Some(EditArg::Shape(s)) => Ok(s),
        _ => Err(invalid(command, index)),
    }
}

const SET_CELL: EditCommand = Command::new("set_cell", 2, set_cell);
const SET_SHAPE: EditCommand = Command::new("set_shape", 1, set_shape);
const APPEND_ATTRIBUTES: EditCommand = Command::new("append_attributes", 2, append_attributes);
const POP_ATTRIBUTES: EditCommand = Command::new("pop_attributes", 0, pop_attributes);
const SET_MACROS: EditCommand = Command::new("set_macros", 1, set_macros);
const INSERT: EditCommand = Command::new("insert", 3, insert);
const REMOVE: EditCommand = Command::new("remove", 3, remove);
const UNINSERT: EditCommand = Command::new("uninsert", 4, uninsert);
const UNREMOVE: EditCommand = Command::new("unremove", 5, unremove);

/// `[coord, code]`: write code, or clear the cell when the code is `None`.
fn set_cell(target: &mut CodeArray, log: &mut EditLog, args: &[EditArg]) -> Result<()> {
    let coord = coord_arg("set_cell", args, 0)?.clone();
    let Some(EditArg::Code(code)) = args.get(1) else {
        return Err(invalid("set_cell", 1));
    };

    let grid = target.dict_grid_mut();
    let previous = match code {
        Some(code) => grid.set(coord.clone(), code.clone()),
        None => grid.delete(&coord),
    };

    log.append(
        SET_CELL.with_args(vec![EditArg::Coord(coord.clone()), EditArg::Code(previous)]),
        SET_CELL.with_args(vec![EditArg::Coord(coord), EditArg::Code(code.clone())]),
    )
}

/// `[shape]`
fn set_shape(target: &mut CodeArray, log: &mut EditLog, args: &[EditArg]) -> Result<()> {
    let shape = shape_arg("set_shape", args, 0)?.clone();
    let previous = target.shape().clone();
    target.set_shape(shape.clone());

    log.append(
        SET_SHAPE.with_args(vec![EditArg::Shape(previous)]),
        SET_SHAPE.with_args(vec![EditArg::Shape(shape)]),
    )
}

/// `[selection, attributes]`
fn append_attributes(target: &mut CodeArray, log: &mut EditLog, args: &[EditArg]) -> Result<()> {
    let (Some(EditArg::Selection(selection)), Some(EditArg::Attributes(attrs))) =
        (args.first(), args.get(1))
    else {
        return Err(invalid("append_attributes", 0));
    };

    target
        .dict_grid_mut()
        .cell_attributes
        .append(selection.clone(), attrs.clone());

    log.append(POP_ATTRIBUTES.with_args(vec![]), APPEND_ATTRIBUTES.with_args(args.to_vec()))
}

/// `[]`: take back the most recent attribute entry.
fn pop_attributes(target: &mut CodeArray, log: &mut EditLog, _args: &[EditArg]) -> Result<()> {
    let Some((selection, attrs)) = target.dict_grid_mut().cell_attributes.pop() else {
        return Ok(());
    };

    log.append(
        APPEND_ATTRIBUTES
            .with_args(vec![EditArg::Selection(selection), EditArg::Attributes(attrs)]),
        POP_ATTRIBUTES.with_args(vec![]),
    )
}

/// `[text]`
fn set_macros(target: &mut CodeArray, log: &mut EditLog, args: &[EditArg]) -> Result<()> {
    let Some(EditArg::Text(macros)) = args.first() else {
        return Err(invalid("set_macros", 0));
    };
    let previous = std::mem::replace(&mut target.dict_grid_mut().macros, macros.clone());

    log.append(
        SET_MACROS.with_args(vec![EditArg::Text(previous)]),
        SET_MACROS.with_args(vec![EditArg::Text(macros.clone())]),
    )
}

/// `[insertion_point, count, axis]`
fn insert(target: &mut CodeArray, log: &mut EditLog, args: &[EditArg]) -> Result<()> {
    let point = count_arg("insert", args, 0)?;
    let count = count_arg("insert", args, 1)?;
    let axis = count_arg("insert", args, 2)?;
    let previous_shape = target.shape().clone();

    target.insert(point, count, axis)?;

    log.append(
        UNINSERT.with_args(vec![
            EditArg::Count(point),
            EditArg::Count(count),
            EditArg::Count(axis),
            EditArg::Shape(previous_shape),
        ]),
        INSERT.with_args(args.to_vec()),
    )
}

/// `[deletion_point, count, axis]`
fn remove(target: &mut CodeArray, log: &mut EditLog, args: &[EditArg]) -> Result<()> {
    let point = count_arg("remove", args, 0)?;
    let count = count_arg("remove", args, 1)?;
    let axis = count_arg("remove", args, 2)?;
    let previous_shape = target.shape().clone();

    let removed = target.remove(point, count, axis)?;

    log.append(
        UNREMOVE.with_args(vec![
            EditArg::Count(point),
            EditArg::Count(count),
            EditArg::Count(axis),
            EditArg::Shape(previous_shape),
            EditArg::Entries(removed),
        ]),
        REMOVE.with_args(args.to_vec()),
    )
}

/// `[insertion_point, count, axis, shape]`: drop inserted slices, reset the shape.
fn uninsert(target: &mut CodeArray, _log: &mut EditLog, args: &[EditArg]) -> Result<()> {
    let point = count_arg("uninsert", args, 0)?;
    let count = count_arg("uninsert", args, 1)?;
    let axis = count_arg("uninsert", args, 2)?;
    let shape = shape_arg("uninsert", args, 3)?.clone();

    target.remove(point, count, axis)?;
    target.set_shape(shape);
    Ok(())
}

/// `[deletion_point, count, axis, shape, entries]`: re-insert removed slices
/// with their code and reset the shape.
fn unremove(target: &mut CodeArray, _log: &mut EditLog, args: &[EditArg]) -> Result<()> {
    let point = count_arg("unremove", args, 0)?;
    let count = count_arg("unremove", args, 1)?;
    let axis = count_arg("unremove", args, 2)?;
    let shape = shape_arg("unremove", args, 3)?.clone();
    let Some(EditArg::Entries(entries)) = args.get(4) else {
        return Err(invalid("unremove", 4));
    };

    target.insert(point, count, axis)?;
    target.dict_grid_mut().code_mut().extend(entries.iter().cloned());
    target.set_shape(shape);
    Ok(())
}

/// One open document.
#[derive(Debug)]
pub struct Document {
    code_array: CodeArray,
    unredo: EditLog,
}

impl Document {
    pub fn new(shape: Shape) -> Self {
        Self::with_history_limit(CodeArray::new(shape), crate::unredo::DEFAULT_MAX_UNREDO)
    }

    /// Empty document sized and limited as configured.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_history_limit(
            CodeArray::new(Shape::new(settings.default_shape.clone())),
            settings.max_unredo,
        )
    }

    /// Document around loaded content, with empty history.
    pub fn from_dict_grid(dict_grid: DictGrid, max_unredo: usize) -> Self {
        Self::with_history_limit(CodeArray::from_dict_grid(dict_grid), max_unredo)
    }

    fn with_history_limit(code_array: CodeArray, max_unredo: usize) -> Self {
        Self { code_array, unredo: UnRedo::new(max_unredo) }
    }

    pub fn code_array(&self) -> &CodeArray {
        &self.code_array
    }

    pub fn dict_grid(&self) -> &DictGrid {
        self.code_array.dict_grid()
    }

    pub fn unredo(&self) -> &EditLog {
        &self.unredo
    }

    fn run(&mut self, command: EditCommand, args: Vec<EditArg>) -> Result<()> {
        (command.run)(&mut self.code_array, &mut self.unredo, &args)
    }

    /// Write code into one cell.
    pub fn set_code(&mut self, key: &Key, code: impl Into<String>) -> Result<()> {
        let coord = self.code_array.scalar_coord(key)?;
        self.run(SET_CELL, vec![EditArg::Coord(coord), EditArg::Code(Some(code.into()))])
    }

    /// Clear one cell.
    pub fn delete_code(&mut self, key: &Key) -> Result<()> {
        let coord = self.code_array.scalar_coord(key)?;
        self.run(SET_CELL, vec![EditArg::Coord(coord), EditArg::Code(None)])
    }

    /// Resize the grid. The shape keeps its number of axes and every bound stays positive.
    pub fn set_shape(&mut self, shape: Shape) -> Result<()> {
        let expected = self.code_array.shape().ndim();
        if shape.ndim() != expected {
            return Err(ModelError::DimensionMismatch { expected, got: shape.ndim() });
        }
        if let Some(axis) = shape.dims().iter().position(|&bound| bound == 0) {
            return Err(ModelError::ZeroBound { axis });
        }
        self.run(SET_SHAPE, vec![EditArg::Shape(shape)])
    }

    /// Format a selection. Earlier formatting stays in the log underneath.
    pub fn append_attributes(&mut self, selection: Selection, attrs: AttrDelta) -> Result<()> {
        self.run(APPEND_ATTRIBUTES, vec![EditArg::Selection(selection), EditArg::Attributes(attrs)])
    }

    pub fn set_macros(&mut self, macros: impl Into<String>) -> Result<()> {
        self.run(SET_MACROS, vec![EditArg::Text(macros.into())])
    }

    /// Insert `count` empty rows, columns or tables before `point`.
    pub fn insert(&mut self, point: usize, count: usize, axis: usize) -> Result<()> {
        let args = vec![EditArg::Count(point), EditArg::Count(count), EditArg::Count(axis)];
        self.run(INSERT, args)
    }

    /// Remove `count` rows, columns or tables starting at `point`.
    pub fn remove(&mut self, point: usize, count: usize, axis: usize) -> Result<()> {
        let args = vec![EditArg::Count(point), EditArg::Count(count), EditArg::Count(axis)];
        self.run(REMOVE, args)
    }

    /// Close the current user action.
    pub fn mark(&mut self) {
        self.unredo.mark();
    }

    pub fn undo(&mut self) -> Result<()> {
        self.unredo.undo(&mut self.code_array)
    }

    pub fn redo(&mut self) -> Result<()> {
        self.unredo.redo(&mut self.code_array)
    }

    /// Forget undo history, e.g. after loading a file.
    pub fn reset_history(&mut self) {
        debug!("history reset for document");
        self.unredo.reset();
    }
}
