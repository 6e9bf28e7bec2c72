//! Capability-directed dispatch over instructions
//!
//! [`Visitor`] has two layers of callbacks. The capability callbacks fire for
//! every instruction whose [`Capabilities`] set contains the matching bit, in
//! the declaration order of the bits, so an analysis interested in (say)
//! everything that can throw overrides one method and ignores the rest. The
//! exact-family callback fires last, for code that does care which family it
//! is looking at.
//!
//! The driver derives everything from [`Instruction::capabilities`]; there is
//! no per-family dispatch table to keep in sync when the catalog grows.

use crate::instruction::{
    AllocOp, ArithOp, ArrayOp, BranchOp, Capabilities, CastOp, CmpOp, ConstLoad, ConvertOp,
    FieldOp, Instruction, LocalOp, MonitorOp, PushOp, ReturnOp, StackOp,
};
use crate::types::CpIndex;

/// Double-dispatch interface over instructions
///
/// Every method has a no-op default, so implementors override only what they
/// care about.
#[allow(unused_variables)]
pub trait Visitor<Lbl> {
    /* Capability callbacks, invoked in this order */

    fn stack_producer(&mut self, instruction: &Instruction<Lbl>) {}
    fn stack_consumer(&mut self, instruction: &Instruction<Lbl>) {}
    fn exception_thrower(&mut self, instruction: &Instruction<Lbl>) {}
    fn typed(&mut self, instruction: &Instruction<Lbl>) {}
    fn constant_push(&mut self, instruction: &Instruction<Lbl>) {}
    fn indexed(&mut self, instruction: &Instruction<Lbl>) {}
    fn local_variable(&mut self, instruction: &Instruction<Lbl>) {}
    fn allocation(&mut self, instruction: &Instruction<Lbl>) {}
    fn load_class(&mut self, instruction: &Instruction<Lbl>) {}
    fn branch(&mut self, instruction: &Instruction<Lbl>) {}

    /* Exact-family callbacks, invoked after the capability callbacks */

    fn visit_nop(&mut self) {}
    fn visit_push(&mut self, op: &PushOp) {}
    fn visit_load_const(&mut self, op: &ConstLoad) {}
    fn visit_local(&mut self, op: &LocalOp) {}
    fn visit_arith(&mut self, op: ArithOp) {}
    fn visit_convert(&mut self, op: ConvertOp) {}
    fn visit_stack(&mut self, op: StackOp) {}
    fn visit_cmp(&mut self, op: CmpOp) {}
    fn visit_array(&mut self, op: &ArrayOp) {}
    fn visit_field(&mut self, op: FieldOp, index: CpIndex) {}
    fn visit_alloc(&mut self, op: &AllocOp) {}
    fn visit_cast(&mut self, op: CastOp, index: CpIndex) {}
    fn visit_return(&mut self, op: ReturnOp) {}
    fn visit_throw(&mut self) {}
    fn visit_monitor(&mut self, op: MonitorOp) {}
    fn visit_branch(&mut self, op: BranchOp, target: &Lbl) {}
}

impl<Lbl> Instruction<Lbl> {
    /// Run a visitor over this instruction: capability callbacks first (in
    /// their fixed order), then the exact-family callback
    pub fn accept<V: Visitor<Lbl>>(&self, visitor: &mut V) {
        let capabilities = self.capabilities();
        if capabilities.contains(Capabilities::STACK_PRODUCER) {
            visitor.stack_producer(self);
        }
        if capabilities.contains(Capabilities::STACK_CONSUMER) {
            visitor.stack_consumer(self);
        }
        if capabilities.contains(Capabilities::EXCEPTION_THROWER) {
            visitor.exception_thrower(self);
        }
        if capabilities.contains(Capabilities::TYPED) {
            visitor.typed(self);
        }
        if capabilities.contains(Capabilities::CONSTANT_PUSH) {
            visitor.constant_push(self);
        }
        if capabilities.contains(Capabilities::INDEXED) {
            visitor.indexed(self);
        }
        if capabilities.contains(Capabilities::LOCAL_VARIABLE) {
            visitor.local_variable(self);
        }
        if capabilities.contains(Capabilities::ALLOCATION) {
            visitor.allocation(self);
        }
        if capabilities.contains(Capabilities::LOAD_CLASS) {
            visitor.load_class(self);
        }
        if capabilities.contains(Capabilities::BRANCH) {
            visitor.branch(self);
        }

        match self {
            Instruction::Nop => visitor.visit_nop(),
            Instruction::Push(op) => visitor.visit_push(op),
            Instruction::LoadConst(op) => visitor.visit_load_const(op),
            Instruction::Local(op) => visitor.visit_local(op),
            Instruction::Arith(op) => visitor.visit_arith(*op),
            Instruction::Convert(op) => visitor.visit_convert(*op),
            Instruction::Stack(op) => visitor.visit_stack(*op),
            Instruction::Cmp(op) => visitor.visit_cmp(*op),
            Instruction::Array(op) => visitor.visit_array(op),
            Instruction::Field(op, index) => visitor.visit_field(*op, *index),
            Instruction::Alloc(op) => visitor.visit_alloc(op),
            Instruction::Cast(op, index) => visitor.visit_cast(*op, *index),
            Instruction::Return(op) => visitor.visit_return(*op),
            Instruction::Throw => visitor.visit_throw(),
            Instruction::Monitor(op) => visitor.visit_monitor(*op),
            Instruction::Branch(op, target) => visitor.visit_branch(*op, target),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::instruction::IfCond;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl<Lbl> Visitor<Lbl> for Recorder {
        fn stack_producer(&mut self, _: &Instruction<Lbl>) {
            self.events.push("stack_producer".into());
        }
        fn stack_consumer(&mut self, _: &Instruction<Lbl>) {
            self.events.push("stack_consumer".into());
        }
        fn exception_thrower(&mut self, _: &Instruction<Lbl>) {
            self.events.push("exception_thrower".into());
        }
        fn typed(&mut self, _: &Instruction<Lbl>) {
            self.events.push("typed".into());
        }
        fn constant_push(&mut self, _: &Instruction<Lbl>) {
            self.events.push("constant_push".into());
        }
        fn indexed(&mut self, _: &Instruction<Lbl>) {
            self.events.push("indexed".into());
        }
        fn local_variable(&mut self, _: &Instruction<Lbl>) {
            self.events.push("local_variable".into());
        }
        fn allocation(&mut self, _: &Instruction<Lbl>) {
            self.events.push("allocation".into());
        }
        fn load_class(&mut self, _: &Instruction<Lbl>) {
            self.events.push("load_class".into());
        }
        fn branch(&mut self, _: &Instruction<Lbl>) {
            self.events.push("branch".into());
        }
        fn visit_load_const(&mut self, op: &ConstLoad) {
            self.events.push(format!("load_const:{:?}", op.index()));
        }
        fn visit_branch(&mut self, _op: BranchOp, target: &Lbl) {
            let _ = target;
            self.events.push("visit_branch".into());
        }
    }

    #[test]
    fn constant_load_fires_its_capabilities_in_order() {
        let ldc: Instruction<i32> = Instruction::LoadConst(ConstLoad::LdcW(CpIndex(9)));
        let mut recorder = Recorder::default();
        ldc.accept(&mut recorder);
        assert_eq!(
            recorder.events,
            vec![
                "stack_producer",
                "exception_thrower",
                "typed",
                "constant_push",
                "indexed",
                "load_class",
                "load_const:CpIndex(9)",
            ]
        );
    }

    #[test]
    fn conditional_branch_consumes_then_branches() {
        let branch: Instruction<i32> = Instruction::Branch(BranchOp::If(IfCond::Ne), -5);
        let mut recorder = Recorder::default();
        branch.accept(&mut recorder);
        assert_eq!(
            recorder.events,
            vec!["stack_consumer", "branch", "visit_branch"]
        );
    }

    #[test]
    fn nop_only_gets_its_exact_callback() {
        struct CountNops(usize);
        impl<Lbl> Visitor<Lbl> for CountNops {
            fn visit_nop(&mut self) {
                self.0 += 1;
            }
        }
        let mut counter = CountNops(0);
        let nop: Instruction<i32> = Instruction::Nop;
        nop.accept(&mut counter);
        nop.accept(&mut counter);
        assert_eq!(counter.0, 2);
    }
}
