//! End-to-end exercise of the editing workflow: build a sequence, inspect its
//! layout, get refused on an unsafe removal, redirect, retry, and round-trip
//! the result through the codec.

use bytegen::{
    ArithOp, BranchOp, CpIndex, Error, FieldOp, IfCond, Instruction, InstructionHandle,
    InstructionList, Offset, PushOp, ReturnOp, Targeter,
};

/// getstatic #5 / iconst_3 / idiv / ifne <getstatic> / return
fn division_guard() -> (InstructionList, Vec<InstructionHandle>) {
    let mut code = InstructionList::new();
    let a = code
        .append(Instruction::Field(FieldOp::GetStatic, CpIndex(5)))
        .unwrap();
    let b = code
        .append(Instruction::Push(PushOp::iconst(3).unwrap()))
        .unwrap();
    let c = code.append(Instruction::Arith(ArithOp::IDiv)).unwrap();
    let d = code
        .append(Instruction::Branch(BranchOp::If(IfCond::Ne), a))
        .unwrap();
    let e = code.append(Instruction::Return(ReturnOp::Return)).unwrap();
    (code, vec![a, b, c, d, e])
}

#[test]
fn layout_and_encoding() {
    let (mut code, handles) = division_guard();

    code.linearize();
    let offsets: Vec<Offset> = handles
        .iter()
        .map(|&h| code.byte_offset(h).unwrap())
        .collect();
    assert_eq!(
        offsets,
        vec![Offset(0), Offset(3), Offset(4), Offset(5), Offset(8)]
    );

    let mut bytes = vec![];
    code.encode(&mut bytes).unwrap();
    // the ifne at offset 5 jumps back to offset 0: displacement -5
    assert_eq!(
        bytes,
        [0xb2, 0x00, 0x05, 0x06, 0x6c, 0x9a, 0xff, 0xfb, 0xb1]
    );
}

#[test]
fn refused_removal_then_redirect_then_retry() {
    let (mut code, handles) = division_guard();
    let (a, c, d) = (handles[0], handles[2], handles[3]);

    // the branch still points at the getstatic, so it cannot go
    match code.remove(a) {
        Err(Error::TargetStillReferenced { handle, targeters }) => {
            assert_eq!(handle, a);
            assert_eq!(targeters, vec![Targeter::Branch(d)]);
        }
        other => panic!("expected a refusal, got {:?}", other),
    }
    assert_eq!(code.len(), 5);

    // move the branch to the idiv, then removal goes through
    code.redirect(Targeter::Branch(d), a, c).unwrap();
    let removed = code.remove(a).unwrap();
    assert_eq!(removed, Instruction::Field(FieldOp::GetStatic, CpIndex(5)));
    assert_eq!(code.len(), 4);

    // the stale handle is dead, not dangling
    assert!(matches!(code.get(a), Err(Error::InvalidHandle(_))));

    // iconst_3 / idiv / ifne <idiv> / return: the ifne at 2 jumps back to 1
    let mut bytes = vec![];
    code.encode(&mut bytes).unwrap();
    assert_eq!(bytes, [0x06, 0x6c, 0x9a, 0xff, 0xff, 0xb1]);
}

#[test]
fn decoded_lists_are_editable() {
    let (mut code, _) = division_guard();
    let mut bytes = vec![];
    code.encode(&mut bytes).unwrap();

    let mut decoded = InstructionList::decode(&bytes).unwrap();
    let handles: Vec<InstructionHandle> = decoded.iter().map(|(h, _)| h).collect();
    assert_eq!(handles.len(), 5);

    // the decoded branch protects its decoded target
    assert!(matches!(
        decoded.remove(handles[0]),
        Err(Error::TargetStillReferenced { .. })
    ));

    // drop the guard branch, then the target
    decoded
        .redirect(Targeter::Branch(handles[3]), handles[0], handles[2])
        .unwrap();
    decoded.remove(handles[0]).unwrap();

    let mut reencoded = vec![];
    decoded.encode(&mut reencoded).unwrap();
    assert_eq!(reencoded, [0x06, 0x6c, 0x9a, 0xff, 0xff, 0xb1]);
}

#[test]
fn exception_table_markers_survive_edits() {
    let (mut code, handles) = division_guard();
    let (b, e) = (handles[1], handles[4]);

    // a try-range spanning from the iconst to the return
    code.register_targeter(Targeter::ExceptionRange(0), b).unwrap();
    code.register_targeter(Targeter::ExceptionRange(0), e).unwrap();

    assert!(matches!(
        code.remove(e),
        Err(Error::TargetStillReferenced { .. })
    ));

    // shrink the range onto the idiv, then the return can go
    code.redirect(Targeter::ExceptionRange(0), e, handles[2]).unwrap();
    code.remove(e).unwrap();
    assert_eq!(code.targeters(handles[2]).unwrap(), &[Targeter::ExceptionRange(0)]);
}
