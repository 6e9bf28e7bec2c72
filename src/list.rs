//! Growable instruction sequences that stay consistent under editing
//!
//! Instructions in a list are referred to through [`InstructionHandle`]s,
//! which stay valid across inserts and removals of *other* elements. Every
//! element knows who points at it (branches inside the list, exception table
//! and local variable table ranges outside it), and removal is refused while
//! any such [`Targeter`] is still registered. That makes dangling jump
//! targets unrepresentable: the only way to drop a targeted instruction is to
//! first [`redirect`] everything that points at it.
//!
//! [`redirect`]: InstructionList::redirect

use crate::instruction::Instruction;
use crate::util::{Offset, Width};
use crate::Error;
use byteorder::WriteBytesExt;
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stable reference to one instruction inside one [`InstructionList`]
///
/// Handles are small and freely copyable. They stay valid until the
/// instruction they name is removed; after that (or when presented to a
/// different list) every operation reports [`Error::InvalidHandle`] instead
/// of silently resolving to whatever reused the storage.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct InstructionHandle {
    list: u64,
    slot: u32,
    generation: u32,
}

impl fmt::Debug for InstructionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ih{}v{}@l{}", self.slot, self.generation, self.list)
    }
}

/// Something that refers to an instruction and must stay consistent when the
/// list is edited
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Targeter {
    /// A branch instruction in the same list
    Branch(InstructionHandle),
    /// Start/end/handler slot of an exception table entry, identified by its
    /// index in that table
    ExceptionRange(u16),
    /// Scope boundary of a local variable table entry, identified by its
    /// index in that table
    LocalVarRange(u16),
}

struct Entry {
    instruction: Instruction<InstructionHandle>,
    targeters: Vec<Targeter>,
    /// Meaningful only while `offsets_valid` holds on the list
    offset: Offset,
}

struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(0);

/// Editable sequence of instructions with branch-consistency bookkeeping
pub struct InstructionList {
    id: u64,
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Live slots in program order
    order: Vec<u32>,
    offsets_valid: bool,
    byte_len: usize,
}

impl Default for InstructionList {
    fn default() -> InstructionList {
        InstructionList::new()
    }
}

impl InstructionList {
    pub fn new() -> InstructionList {
        InstructionList {
            id: NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed),
            slots: vec![],
            free: vec![],
            order: vec![],
            offsets_valid: true,
            byte_len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Resolve a handle to its slot index, rejecting foreign and stale handles
    fn slot_of(&self, handle: InstructionHandle) -> Result<usize, Error> {
        if handle.list == self.id {
            if let Some(slot) = self.slots.get(handle.slot as usize) {
                if slot.generation == handle.generation && slot.entry.is_some() {
                    return Ok(handle.slot as usize);
                }
            }
        }
        Err(Error::InvalidHandle(handle))
    }

    fn entry(&self, handle: InstructionHandle) -> Result<&Entry, Error> {
        let slot = self.slot_of(handle)?;
        self.slots[slot]
            .entry
            .as_ref()
            .ok_or(Error::InvalidHandle(handle))
    }

    fn entry_mut(&mut self, handle: InstructionHandle) -> Result<&mut Entry, Error> {
        let slot = self.slot_of(handle)?;
        self.slots[slot]
            .entry
            .as_mut()
            .ok_or(Error::InvalidHandle(handle))
    }

    pub fn get(&self, handle: InstructionHandle) -> Result<&Instruction<InstructionHandle>, Error> {
        Ok(&self.entry(handle)?.instruction)
    }

    /// Incoming references currently registered on an instruction
    pub fn targeters(&self, handle: InstructionHandle) -> Result<&[Targeter], Error> {
        Ok(self.entry(handle)?.targeters.as_slice())
    }

    /// Append an instruction at the end of the sequence
    pub fn append(
        &mut self,
        instruction: Instruction<InstructionHandle>,
    ) -> Result<InstructionHandle, Error> {
        self.insert_at(self.order.len(), instruction)
    }

    /// Insert an instruction immediately before an existing one
    pub fn insert_before(
        &mut self,
        position: InstructionHandle,
        instruction: Instruction<InstructionHandle>,
    ) -> Result<InstructionHandle, Error> {
        let index = self.order_index(position)?;
        self.insert_at(index, instruction)
    }

    /// Insert an instruction immediately after an existing one
    pub fn insert_after(
        &mut self,
        position: InstructionHandle,
        instruction: Instruction<InstructionHandle>,
    ) -> Result<InstructionHandle, Error> {
        let index = self.order_index(position)?;
        self.insert_at(index + 1, instruction)
    }

    fn order_index(&self, handle: InstructionHandle) -> Result<usize, Error> {
        let slot = self.slot_of(handle)?;
        self.order
            .iter()
            .position(|&s| s as usize == slot)
            .ok_or(Error::InvalidHandle(handle))
    }

    fn insert_at(
        &mut self,
        index: usize,
        instruction: Instruction<InstructionHandle>,
    ) -> Result<InstructionHandle, Error> {
        // a branch may only enter the list pointing at a live member
        if let Some(&target) = instruction.branch_target() {
            self.slot_of(target)
                .map_err(|_| Error::UnresolvedTarget { target })?;
        }
        let target = instruction.branch_target().copied();

        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.slots.push(Slot { generation: 0, entry: None });
                (self.slots.len() - 1) as u32
            }
        };
        let handle = InstructionHandle {
            list: self.id,
            slot,
            generation: self.slots[slot as usize].generation,
        };
        self.slots[slot as usize].entry = Some(Entry {
            instruction,
            targeters: vec![],
            offset: Offset(0),
        });
        self.order.insert(index, slot);

        if let Some(target) = target {
            self.add_targeter(target, Targeter::Branch(handle))?;
        }
        self.offsets_valid = false;
        Ok(handle)
    }

    fn add_targeter(&mut self, on: InstructionHandle, targeter: Targeter) -> Result<(), Error> {
        let entry = self.entry_mut(on)?;
        if !entry.targeters.contains(&targeter) {
            entry.targeters.push(targeter);
        }
        Ok(())
    }

    /// Register an external reference (exception range, local variable range)
    /// on an instruction, protecting it from removal
    pub fn register_targeter(
        &mut self,
        targeter: Targeter,
        on: InstructionHandle,
    ) -> Result<(), Error> {
        self.add_targeter(on, targeter)
    }

    /// Drop a previously registered reference
    pub fn deregister_targeter(
        &mut self,
        targeter: Targeter,
        on: InstructionHandle,
    ) -> Result<(), Error> {
        let entry = self.entry_mut(on)?;
        let index = entry
            .targeters
            .iter()
            .position(|t| *t == targeter)
            .ok_or(Error::NotATargeter { targeter, handle: on })?;
        entry.targeters.remove(index);
        Ok(())
    }

    /// Remove an instruction, refusing while anything still points at it
    ///
    /// On refusal the list is untouched and the error carries every
    /// registered targeter, so the caller can [`redirect`] them and retry.
    ///
    /// [`redirect`]: InstructionList::redirect
    pub fn remove(
        &mut self,
        handle: InstructionHandle,
    ) -> Result<Instruction<InstructionHandle>, Error> {
        let slot = self.slot_of(handle)?;
        {
            let entry = self.slots[slot].entry.as_ref().ok_or(Error::InvalidHandle(handle))?;
            if !entry.targeters.is_empty() {
                return Err(Error::TargetStillReferenced {
                    handle,
                    targeters: entry.targeters.clone(),
                });
            }
        }
        let entry = match self.slots[slot].entry.take() {
            Some(entry) => entry,
            None => return Err(Error::InvalidHandle(handle)),
        };
        self.slots[slot].generation = self.slots[slot].generation.wrapping_add(1);
        self.free.push(handle.slot);
        if let Some(index) = self.order.iter().position(|&s| s as usize == slot) {
            self.order.remove(index);
        }

        // the removed instruction's own outgoing reference goes away with it
        if let Some(&target) = entry.instruction.branch_target() {
            if let Ok(target_entry) = self.entry_mut(target) {
                target_entry.targeters.retain(|t| *t != Targeter::Branch(handle));
            }
        }
        self.offsets_valid = false;
        Ok(entry.instruction)
    }

    /// Move one registered targeter from one instruction to another
    ///
    /// For a [`Targeter::Branch`] this also rewrites the branch instruction's
    /// target; external range markers only have their registration moved.
    pub fn redirect(
        &mut self,
        targeter: Targeter,
        from: InstructionHandle,
        to: InstructionHandle,
    ) -> Result<(), Error> {
        let from_slot = self.slot_of(from)?;
        self.slot_of(to)?;
        if let Targeter::Branch(branch) = targeter {
            self.slot_of(branch)?;
        }
        {
            let entry = self.slots[from_slot]
                .entry
                .as_mut()
                .ok_or(Error::InvalidHandle(from))?;
            let index = entry
                .targeters
                .iter()
                .position(|t| *t == targeter)
                .ok_or(Error::NotATargeter { targeter, handle: from })?;
            entry.targeters.remove(index);
        }
        self.add_targeter(to, targeter)?;
        if let Targeter::Branch(branch) = targeter {
            let entry = self.entry_mut(branch)?;
            if let Instruction::Branch(_, target) = &mut entry.instruction {
                *target = to;
            }
        }
        Ok(())
    }

    /// Swap out the instruction behind a handle, keeping its identity and
    /// every incoming targeter
    pub fn replace(
        &mut self,
        handle: InstructionHandle,
        instruction: Instruction<InstructionHandle>,
    ) -> Result<Instruction<InstructionHandle>, Error> {
        let slot = self.slot_of(handle)?;
        if let Some(&target) = instruction.branch_target() {
            self.slot_of(target)
                .map_err(|_| Error::UnresolvedTarget { target })?;
        }
        let old = {
            let entry = self.slots[slot].entry.as_mut().ok_or(Error::InvalidHandle(handle))?;
            std::mem::replace(&mut entry.instruction, instruction)
        };
        if let Some(&old_target) = old.branch_target() {
            if let Ok(target_entry) = self.entry_mut(old_target) {
                target_entry.targeters.retain(|t| *t != Targeter::Branch(handle));
            }
        }
        let new_target = self.entry(handle)?.instruction.branch_target().copied();
        if let Some(target) = new_target {
            self.add_targeter(target, Targeter::Branch(handle))?;
        }
        self.offsets_valid = false;
        Ok(old)
    }

    /// Instructions in program order, with their handles
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (InstructionHandle, &Instruction<InstructionHandle>)> + '_ {
        self.order.iter().filter_map(move |&slot| {
            let s = &self.slots[slot as usize];
            s.entry.as_ref().map(|entry| {
                let handle = InstructionHandle {
                    list: self.id,
                    slot,
                    generation: s.generation,
                };
                (handle, &entry.instruction)
            })
        })
    }

    /// Assign a byte offset to every instruction and return the total encoded
    /// length
    ///
    /// Offsets stay valid until the next structural edit; queries against
    /// stale offsets report [`Error::StaleOffsets`] rather than a wrong
    /// number.
    pub fn linearize(&mut self) -> usize {
        let mut offset = 0;
        for &slot in &self.order {
            if let Some(entry) = self.slots[slot as usize].entry.as_mut() {
                entry.offset = Offset(offset);
                offset += entry.instruction.width();
            }
        }
        self.byte_len = offset;
        self.offsets_valid = true;
        debug!(
            "linearized {} instructions into {} bytes",
            self.order.len(),
            offset
        );
        offset
    }

    /// Byte offset of an instruction as of the last [`linearize`]
    ///
    /// [`linearize`]: InstructionList::linearize
    pub fn byte_offset(&self, handle: InstructionHandle) -> Result<Offset, Error> {
        if !self.offsets_valid {
            return Err(Error::StaleOffsets);
        }
        Ok(self.entry(handle)?.offset)
    }

    /// Total encoded length as of the last [`linearize`]
    ///
    /// [`linearize`]: InstructionList::linearize
    pub fn byte_len(&self) -> Result<usize, Error> {
        if !self.offsets_valid {
            return Err(Error::StaleOffsets);
        }
        Ok(self.byte_len)
    }

    /// Find the instruction starting at a byte offset, if any does
    pub fn handle_at_offset(&self, offset: Offset) -> Result<Option<InstructionHandle>, Error> {
        if !self.offsets_valid {
            return Err(Error::StaleOffsets);
        }
        for &slot in &self.order {
            let s = &self.slots[slot as usize];
            if let Some(entry) = &s.entry {
                if entry.offset == offset {
                    return Ok(Some(InstructionHandle {
                        list: self.id,
                        slot,
                        generation: s.generation,
                    }));
                }
            }
        }
        Ok(None)
    }

    /// Linearize and write the whole sequence, resolving every branch target
    /// to a signed displacement relative to the branch's own offset
    pub fn encode<W: WriteBytesExt>(&mut self, writer: &mut W) -> Result<(), Error> {
        self.linearize();
        for &slot in &self.order {
            let entry = match &self.slots[slot as usize].entry {
                Some(entry) => entry,
                None => continue,
            };
            let from = entry.offset;
            let resolved: Instruction<i32> = entry.instruction.map_target(|&target| {
                let displacement = self.entry(target)?.offset - from;
                i32::try_from(displacement).map_err(|_| Error::BranchOffsetOverflow {
                    opcode: entry.instruction.opcode(),
                    displacement,
                })
            })?;
            resolved.encode(writer)?;
        }
        debug!("encoded {} instructions, {} bytes", self.order.len(), self.byte_len);
        Ok(())
    }

    /// Parse a byte stream back into an editable list
    ///
    /// Branch displacements are resolved to handles; a displacement that does
    /// not land on an instruction boundary is a
    /// [`Error::BadBranchDisplacement`].
    pub fn decode(bytes: &[u8]) -> Result<InstructionList, Error> {
        let mut cursor = Cursor::new(bytes);
        let mut decoded: Vec<(usize, Instruction<i32>)> = vec![];
        while (cursor.position() as usize) < bytes.len() {
            let start = cursor.position() as usize;
            let instruction = Instruction::read_from(&mut cursor)?;
            decoded.push((start, instruction));
        }

        let mut list = InstructionList::new();
        // allocate every slot up front so forward branches can resolve
        let mut handle_at: HashMap<usize, InstructionHandle> = HashMap::new();
        for (index, (start, _)) in decoded.iter().enumerate() {
            let slot = index as u32;
            list.slots.push(Slot { generation: 0, entry: None });
            list.order.push(slot);
            handle_at.insert(
                *start,
                InstructionHandle { list: list.id, slot, generation: 0 },
            );
        }

        let mut registrations: Vec<(InstructionHandle, Targeter)> = vec![];
        for (index, (start, instruction)) in decoded.iter().enumerate() {
            let resolved = instruction.map_target(|&displacement| {
                let target = *start as isize + displacement as isize;
                usize::try_from(target)
                    .ok()
                    .and_then(|target| handle_at.get(&target))
                    .copied()
                    .ok_or(Error::BadBranchDisplacement {
                        opcode: instruction.opcode(),
                        displacement,
                    })
            })?;
            let handle = InstructionHandle {
                list: list.id,
                slot: index as u32,
                generation: 0,
            };
            if let Some(&target) = resolved.branch_target() {
                registrations.push((target, Targeter::Branch(handle)));
            }
            list.slots[index].entry = Some(Entry {
                instruction: resolved,
                targeters: vec![],
                offset: Offset(*start),
            });
        }
        for (target, targeter) in registrations {
            if let Some(entry) = list.slots[target.slot as usize].entry.as_mut() {
                if !entry.targeters.contains(&targeter) {
                    entry.targeters.push(targeter);
                }
            }
        }
        list.byte_len = bytes.len();
        list.offsets_valid = true;
        debug!("decoded {} instructions from {} bytes", list.len(), bytes.len());
        Ok(list)
    }
}
