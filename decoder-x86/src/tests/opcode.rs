use crate::{ConditionCode, Instruction, Opcode, Operand, RangeError, RegSpec, Shape};

#[test]
fn conditional_instructions() {
    const JCC: &[(Opcode, ConditionCode); 16] = &[
        (Opcode::JO, ConditionCode::O),
        (Opcode::JNO, ConditionCode::NO),
        (Opcode::JB, ConditionCode::B),
        (Opcode::JAE, ConditionCode::AE),
        (Opcode::JZ, ConditionCode::Z),
        (Opcode::JNZ, ConditionCode::NZ),
        (Opcode::JA, ConditionCode::A),
        (Opcode::JBE, ConditionCode::BE),
        (Opcode::JS, ConditionCode::S),
        (Opcode::JNS, ConditionCode::NS),
        (Opcode::JP, ConditionCode::P),
        (Opcode::JNP, ConditionCode::NP),
        (Opcode::JL, ConditionCode::L),
        (Opcode::JGE, ConditionCode::GE),
        (Opcode::JG, ConditionCode::G),
        (Opcode::JLE, ConditionCode::LE),
    ];
    for (opc, cond) in JCC.iter() {
        assert!(opc.is_jcc());
        assert!(!opc.is_setcc());
        assert!(!opc.is_cmovcc());
        assert_eq!(opc.condition(), Some(*cond));
    }

    const SETCC: &[(Opcode, ConditionCode); 16] = &[
        (Opcode::SETO, ConditionCode::O),
        (Opcode::SETNO, ConditionCode::NO),
        (Opcode::SETB, ConditionCode::B),
        (Opcode::SETAE, ConditionCode::AE),
        (Opcode::SETZ, ConditionCode::Z),
        (Opcode::SETNZ, ConditionCode::NZ),
        (Opcode::SETA, ConditionCode::A),
        (Opcode::SETBE, ConditionCode::BE),
        (Opcode::SETS, ConditionCode::S),
        (Opcode::SETNS, ConditionCode::NS),
        (Opcode::SETP, ConditionCode::P),
        (Opcode::SETNP, ConditionCode::NP),
        (Opcode::SETL, ConditionCode::L),
        (Opcode::SETGE, ConditionCode::GE),
        (Opcode::SETG, ConditionCode::G),
        (Opcode::SETLE, ConditionCode::LE),
    ];
    for (opc, cond) in SETCC.iter() {
        assert!(!opc.is_jcc());
        assert!(opc.is_setcc());
        assert!(!opc.is_cmovcc());
        assert_eq!(opc.condition(), Some(*cond));
    }

    const CMOVCC: &[(Opcode, ConditionCode); 16] = &[
        (Opcode::CMOVO, ConditionCode::O),
        (Opcode::CMOVNO, ConditionCode::NO),
        (Opcode::CMOVB, ConditionCode::B),
        (Opcode::CMOVAE, ConditionCode::AE),
        (Opcode::CMOVZ, ConditionCode::Z),
        (Opcode::CMOVNZ, ConditionCode::NZ),
        (Opcode::CMOVA, ConditionCode::A),
        (Opcode::CMOVBE, ConditionCode::BE),
        (Opcode::CMOVS, ConditionCode::S),
        (Opcode::CMOVNS, ConditionCode::NS),
        (Opcode::CMOVP, ConditionCode::P),
        (Opcode::CMOVNP, ConditionCode::NP),
        (Opcode::CMOVL, ConditionCode::L),
        (Opcode::CMOVGE, ConditionCode::GE),
        (Opcode::CMOVG, ConditionCode::G),
        (Opcode::CMOVLE, ConditionCode::LE),
    ];
    for (opc, cond) in CMOVCC.iter() {
        assert!(!opc.is_jcc());
        assert!(!opc.is_setcc());
        assert!(opc.is_cmovcc());
        assert_eq!(opc.condition(), Some(*cond));
    }

    assert_eq!(Opcode::JMP.condition(), None);
    assert_eq!(Opcode::JECXZ.condition(), None);
}

#[test]
fn shapes_and_names() {
    assert_eq!(Opcode::RET.shape(), Shape::Nullary);
    assert_eq!(Opcode::RETN.shape(), Shape::Unary);
    assert_eq!(Opcode::RET.name(), Opcode::RETN.name());
    assert_eq!(Opcode::IMUL.shape(), Shape::Unary);
    assert_eq!(Opcode::IMUL2.shape(), Shape::Arithmetic);
    assert_eq!(Opcode::IMUL3.shape(), Shape::Ternary);
    assert_eq!(Opcode::IMUL3.name(), "imul");
    assert_eq!(Opcode::LONGNOP.name(), "nop");
    assert_eq!(Opcode::CALL.shape(), Shape::Jump);
    assert_eq!(Opcode::ANDN.shape().arity(), 3);

    for opcode in Opcode::ALL {
        assert!(!opcode.name().is_empty());
        assert_eq!(opcode.name(), opcode.name().to_lowercase());
    }

    let mut sorted = Opcode::ALL.to_vec();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), Opcode::ALL.len());
}

#[test]
fn build_from_operands() {
    let operands = [Operand::from(RegSpec::eax()), Operand::from(RegSpec::ecx())];

    let inst = Instruction::from_operands(Opcode::ADD, &operands).unwrap();
    assert_eq!(inst.opcode(), Opcode::ADD);
    assert_eq!(inst.shape(), Shape::Arithmetic);
    assert_eq!(inst.operands(), &operands);
    assert_eq!(inst.operand(1), Some(&operands[1]));
    assert_eq!(inst.operand(2), None);
    assert_eq!(inst.operand_count(), 2);

    assert_eq!(
        Instruction::from_operands(Opcode::RET, &operands),
        Err(RangeError::Arity {
            opcode: Opcode::RET,
            expected: 0,
            found: 2
        })
    );
    assert!(Instruction::from_operands(Opcode::PUSH, &operands[..1]).is_ok());
    assert!(Instruction::from_operands(Opcode::PUSH, &[]).is_err());

    for opcode in Opcode::ALL {
        let operands = vec![Operand::from(RegSpec::eax()); opcode.shape().arity()];
        let inst = Instruction::from_operands(*opcode, &operands).unwrap();
        assert_eq!(inst.opcode(), *opcode);
    }
}

#[test]
fn comments() {
    let inst = Instruction::from_operands(Opcode::CPUID, &[]).unwrap();
    assert_eq!(inst.comment(), None);

    let mut inst = inst.with_comment("serialize");
    assert_eq!(inst.comment(), Some("serialize"));

    inst.set_comment(None);
    assert_eq!(inst.comment(), None);
}
