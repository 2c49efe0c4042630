//! Instruction dispatch: typed operands in, ISU call, result out.

use opsem_common::{
    ArrayCell, Block, ElementKind, FieldRef, Instruction, Kind, MethodRef, Object, Opcode,
    Operand, Reference, Value,
};

use crate::arith::{self, FloatArith, IntArith};
use crate::compare::{self, Condition, NanPolicy};
use crate::constant;
use crate::convert;
use crate::error::{ExecError, Fault};
use crate::machine::{Control, Frame, Primitive};
use crate::statics::{FieldError, StaticFields};
use crate::storage;

fn faulted(at: usize) -> impl FnOnce(Fault) -> ExecError {
    move |fault| ExecError::Fault { at, fault }
}

fn field_error(at: usize, err: FieldError) -> ExecError {
    match err {
        FieldError::Unknown(name) => ExecError::UnknownField { at, name },
        FieldError::KindMismatch {
            name,
            declared,
            found,
        } => ExecError::FieldKindMismatch {
            at,
            name,
            declared,
            found,
        },
    }
}

/// The array behind a reference, or why there is none.
fn array_cell(r: &Reference, at: usize, opcode: Opcode) -> Result<&ArrayCell, ExecError> {
    match r.object() {
        None => Err(ExecError::NullReference { at }),
        Some(Object::Array(cell)) => Ok(cell),
        Some(_) => Err(ExecError::NotAnArray { at, opcode }),
    }
}

impl Frame {
    /// Execute a block from the current pc until a control event or the
    /// end of the block.
    pub fn run(&mut self, block: &Block, statics: &StaticFields) -> Result<Control, ExecError> {
        while let Some(instr) = block.get(self.pc) {
            let control = self.step(instr, statics)?;
            if control != Control::Continue {
                return Ok(control);
            }
        }
        log::trace!("fell off the end of the block at {}", self.pc);
        Ok(Control::Continue)
    }

    /// Execute one instruction as if it sat at the current pc, then
    /// advance the pc past it.
    pub fn step(
        &mut self,
        instr: &Instruction,
        statics: &StaticFields,
    ) -> Result<Control, ExecError> {
        log::trace!("{:>4}: {:<24} depth={}", self.pc, instr, self.stack.len());
        let control = match self.dispatch(instr, statics) {
            Ok(control) => control,
            Err(err) => {
                log::debug!("{err}");
                return Err(err);
            }
        };
        if control != Control::Continue {
            log::debug!("{} at {}: {:?}", instr.opcode, self.pc, control);
        }
        self.pc += 1;
        Ok(control)
    }

    fn dispatch(
        &mut self,
        instr: &Instruction,
        statics: &StaticFields,
    ) -> Result<Control, ExecError> {
        let op = instr.opcode;
        match op {
            // Constants
            Opcode::AconstNull
            | Opcode::IconstM1
            | Opcode::Iconst0
            | Opcode::Iconst1
            | Opcode::Iconst2
            | Opcode::Iconst3
            | Opcode::Iconst4
            | Opcode::Iconst5
            | Opcode::Lconst0
            | Opcode::Lconst1
            | Opcode::Fconst0
            | Opcode::Fconst1
            | Opcode::Fconst2
            | Opcode::Dconst0
            | Opcode::Dconst1 => self.exec_implicit_constant(op)?,
            Opcode::Bipush | Opcode::Sipush => self.exec_push_immediate(instr)?,
            Opcode::Ldc | Opcode::LdcW => self.exec_ldc(instr, false)?,
            Opcode::Ldc2W => self.exec_ldc(instr, true)?,

            // Loads
            Opcode::Iload => self.exec_load(op, Kind::Int, self.local_operand(instr)?)?,
            Opcode::Lload => self.exec_load(op, Kind::Long, self.local_operand(instr)?)?,
            Opcode::Fload => self.exec_load(op, Kind::Float, self.local_operand(instr)?)?,
            Opcode::Dload => self.exec_load(op, Kind::Double, self.local_operand(instr)?)?,
            Opcode::Aload => self.exec_load(op, Kind::Reference, self.local_operand(instr)?)?,
            Opcode::Iload0 => self.exec_load(op, Kind::Int, 0)?,
            Opcode::Iload1 => self.exec_load(op, Kind::Int, 1)?,
            Opcode::Iload2 => self.exec_load(op, Kind::Int, 2)?,
            Opcode::Iload3 => self.exec_load(op, Kind::Int, 3)?,
            Opcode::Lload0 => self.exec_load(op, Kind::Long, 0)?,
            Opcode::Lload1 => self.exec_load(op, Kind::Long, 1)?,
            Opcode::Lload2 => self.exec_load(op, Kind::Long, 2)?,
            Opcode::Lload3 => self.exec_load(op, Kind::Long, 3)?,
            Opcode::Fload0 => self.exec_load(op, Kind::Float, 0)?,
            Opcode::Fload1 => self.exec_load(op, Kind::Float, 1)?,
            Opcode::Fload2 => self.exec_load(op, Kind::Float, 2)?,
            Opcode::Fload3 => self.exec_load(op, Kind::Float, 3)?,
            Opcode::Dload0 => self.exec_load(op, Kind::Double, 0)?,
            Opcode::Dload1 => self.exec_load(op, Kind::Double, 1)?,
            Opcode::Dload2 => self.exec_load(op, Kind::Double, 2)?,
            Opcode::Dload3 => self.exec_load(op, Kind::Double, 3)?,
            Opcode::Aload0 => self.exec_load(op, Kind::Reference, 0)?,
            Opcode::Aload1 => self.exec_load(op, Kind::Reference, 1)?,
            Opcode::Aload2 => self.exec_load(op, Kind::Reference, 2)?,
            Opcode::Aload3 => self.exec_load(op, Kind::Reference, 3)?,

            // Stores
            Opcode::Istore => self.exec_store(op, Kind::Int, self.local_operand(instr)?)?,
            Opcode::Lstore => self.exec_store(op, Kind::Long, self.local_operand(instr)?)?,
            Opcode::Fstore => self.exec_store(op, Kind::Float, self.local_operand(instr)?)?,
            Opcode::Dstore => self.exec_store(op, Kind::Double, self.local_operand(instr)?)?,
            Opcode::Astore => self.exec_store(op, Kind::Reference, self.local_operand(instr)?)?,
            Opcode::Istore0 => self.exec_store(op, Kind::Int, 0)?,
            Opcode::Istore1 => self.exec_store(op, Kind::Int, 1)?,
            Opcode::Istore2 => self.exec_store(op, Kind::Int, 2)?,
            Opcode::Istore3 => self.exec_store(op, Kind::Int, 3)?,
            Opcode::Lstore0 => self.exec_store(op, Kind::Long, 0)?,
            Opcode::Lstore1 => self.exec_store(op, Kind::Long, 1)?,
            Opcode::Lstore2 => self.exec_store(op, Kind::Long, 2)?,
            Opcode::Lstore3 => self.exec_store(op, Kind::Long, 3)?,
            Opcode::Fstore0 => self.exec_store(op, Kind::Float, 0)?,
            Opcode::Fstore1 => self.exec_store(op, Kind::Float, 1)?,
            Opcode::Fstore2 => self.exec_store(op, Kind::Float, 2)?,
            Opcode::Fstore3 => self.exec_store(op, Kind::Float, 3)?,
            Opcode::Dstore0 => self.exec_store(op, Kind::Double, 0)?,
            Opcode::Dstore1 => self.exec_store(op, Kind::Double, 1)?,
            Opcode::Dstore2 => self.exec_store(op, Kind::Double, 2)?,
            Opcode::Dstore3 => self.exec_store(op, Kind::Double, 3)?,
            Opcode::Astore0 => self.exec_store(op, Kind::Reference, 0)?,
            Opcode::Astore1 => self.exec_store(op, Kind::Reference, 1)?,
            Opcode::Astore2 => self.exec_store(op, Kind::Reference, 2)?,
            Opcode::Astore3 => self.exec_store(op, Kind::Reference, 3)?,

            // Arrays
            Opcode::Iaload => self.exec_array_load(op, ElementKind::Int)?,
            Opcode::Laload => self.exec_array_load(op, ElementKind::Long)?,
            Opcode::Faload => self.exec_array_load(op, ElementKind::Float)?,
            Opcode::Daload => self.exec_array_load(op, ElementKind::Double)?,
            Opcode::Aaload => self.exec_array_load(op, ElementKind::Reference)?,
            Opcode::Baload => self.exec_array_load(op, ElementKind::Byte)?,
            Opcode::Caload => self.exec_array_load(op, ElementKind::Char)?,
            Opcode::Saload => self.exec_array_load(op, ElementKind::Short)?,
            Opcode::Iastore => self.exec_array_store(op, ElementKind::Int)?,
            Opcode::Lastore => self.exec_array_store(op, ElementKind::Long)?,
            Opcode::Fastore => self.exec_array_store(op, ElementKind::Float)?,
            Opcode::Dastore => self.exec_array_store(op, ElementKind::Double)?,
            Opcode::Aastore => self.exec_array_store(op, ElementKind::Reference)?,
            Opcode::Bastore => self.exec_array_store(op, ElementKind::Byte)?,
            Opcode::Castore => self.exec_array_store(op, ElementKind::Char)?,
            Opcode::Sastore => self.exec_array_store(op, ElementKind::Short)?,
            Opcode::Newarray => self.exec_newarray(instr)?,
            Opcode::Anewarray => self.exec_new_array(op, ElementKind::Reference)?,
            Opcode::Arraylength => self.exec_arraylength(op)?,

            // Stack
            Opcode::Pop => {
                self.pop()?;
            }
            Opcode::Dup => {
                let top = self.pop()?;
                self.push(top.clone())?;
                self.push(top)?;
            }
            Opcode::Swap => {
                let b = self.pop()?;
                let a = self.pop()?;
                self.push(b)?;
                self.push(a)?;
            }

            // Arithmetic
            Opcode::Iadd => self.binary::<i32>(op, IntArith::add)?,
            Opcode::Ladd => self.binary::<i64>(op, IntArith::add)?,
            Opcode::Fadd => self.binary::<f32>(op, FloatArith::add)?,
            Opcode::Dadd => self.binary::<f64>(op, FloatArith::add)?,
            Opcode::Isub => self.binary::<i32>(op, IntArith::sub)?,
            Opcode::Lsub => self.binary::<i64>(op, IntArith::sub)?,
            Opcode::Fsub => self.binary::<f32>(op, FloatArith::sub)?,
            Opcode::Dsub => self.binary::<f64>(op, FloatArith::sub)?,
            Opcode::Imul => self.binary::<i32>(op, IntArith::mul)?,
            Opcode::Lmul => self.binary::<i64>(op, IntArith::mul)?,
            Opcode::Fmul => self.binary::<f32>(op, FloatArith::mul)?,
            Opcode::Dmul => self.binary::<f64>(op, FloatArith::mul)?,
            Opcode::Idiv => self.binary_checked::<i32>(op, IntArith::div)?,
            Opcode::Ldiv => self.binary_checked::<i64>(op, IntArith::div)?,
            Opcode::Fdiv => self.binary::<f32>(op, FloatArith::div)?,
            Opcode::Ddiv => self.binary::<f64>(op, FloatArith::div)?,
            Opcode::Irem => self.binary_checked::<i32>(op, IntArith::rem)?,
            Opcode::Lrem => self.binary_checked::<i64>(op, IntArith::rem)?,
            Opcode::Frem => self.binary::<f32>(op, FloatArith::rem)?,
            Opcode::Drem => self.binary::<f64>(op, FloatArith::rem)?,
            Opcode::Ineg => self.unary::<i32, i32>(op, IntArith::neg)?,
            Opcode::Lneg => self.unary::<i64, i64>(op, IntArith::neg)?,
            Opcode::Fneg => self.unary::<f32, f32>(op, FloatArith::neg)?,
            Opcode::Dneg => self.unary::<f64, f64>(op, FloatArith::neg)?,

            // Shifts and bitwise
            Opcode::Ishl => self.shift::<i32>(op, IntArith::shl)?,
            Opcode::Lshl => self.shift::<i64>(op, IntArith::shl)?,
            Opcode::Ishr => self.shift::<i32>(op, IntArith::shr)?,
            Opcode::Lshr => self.shift::<i64>(op, IntArith::shr)?,
            Opcode::Iushr => self.shift::<i32>(op, IntArith::ushr)?,
            Opcode::Lushr => self.shift::<i64>(op, IntArith::ushr)?,
            Opcode::Iand => self.binary::<i32>(op, IntArith::and)?,
            Opcode::Land => self.binary::<i64>(op, IntArith::and)?,
            Opcode::Ior => self.binary::<i32>(op, IntArith::or)?,
            Opcode::Lor => self.binary::<i64>(op, IntArith::or)?,
            Opcode::Ixor => self.binary::<i32>(op, IntArith::xor)?,
            Opcode::Lxor => self.binary::<i64>(op, IntArith::xor)?,
            Opcode::Iinc => self.exec_iinc(instr)?,

            // Conversions
            Opcode::I2l => self.unary::<i32, i64>(op, convert::i2l)?,
            Opcode::I2f => self.unary::<i32, f32>(op, convert::i2f)?,
            Opcode::I2d => self.unary::<i32, f64>(op, convert::i2d)?,
            Opcode::L2i => self.unary::<i64, i32>(op, convert::l2i)?,
            Opcode::L2f => self.unary::<i64, f32>(op, convert::l2f)?,
            Opcode::L2d => self.unary::<i64, f64>(op, convert::l2d)?,
            Opcode::F2i => self.unary::<f32, i32>(op, convert::f2i)?,
            Opcode::F2l => self.unary::<f32, i64>(op, convert::f2l)?,
            Opcode::F2d => self.unary::<f32, f64>(op, convert::f2d)?,
            Opcode::D2i => self.unary::<f64, i32>(op, convert::d2i)?,
            Opcode::D2l => self.unary::<f64, i64>(op, convert::d2l)?,
            Opcode::D2f => self.unary::<f64, f32>(op, convert::d2f)?,
            Opcode::I2b => self.unary::<i32, i32>(op, convert::i2b)?,
            Opcode::I2c => self.unary::<i32, i32>(op, convert::i2c)?,
            Opcode::I2s => self.unary::<i32, i32>(op, convert::i2s)?,

            // Three-way comparison
            Opcode::Lcmp => self.three_way::<i64>(op, compare::long_cmp)?,
            Opcode::Fcmpl => {
                self.three_way::<f32>(op, |a, b| compare::float_cmp(a, b, NanPolicy::Less))?
            }
            Opcode::Fcmpg => {
                self.three_way::<f32>(op, |a, b| compare::float_cmp(a, b, NanPolicy::Greater))?
            }
            Opcode::Dcmpl => {
                self.three_way::<f64>(op, |a, b| compare::float_cmp(a, b, NanPolicy::Less))?
            }
            Opcode::Dcmpg => {
                self.three_way::<f64>(op, |a, b| compare::float_cmp(a, b, NanPolicy::Greater))?
            }

            // Conditional branches
            Opcode::Ifeq => return self.exec_if(instr, Condition::Eq),
            Opcode::Ifne => return self.exec_if(instr, Condition::Ne),
            Opcode::Iflt => return self.exec_if(instr, Condition::Lt),
            Opcode::Ifge => return self.exec_if(instr, Condition::Ge),
            Opcode::Ifgt => return self.exec_if(instr, Condition::Gt),
            Opcode::Ifle => return self.exec_if(instr, Condition::Le),
            Opcode::IfIcmpeq => return self.exec_if_icmp(instr, Condition::Eq),
            Opcode::IfIcmpne => return self.exec_if_icmp(instr, Condition::Ne),
            Opcode::IfIcmplt => return self.exec_if_icmp(instr, Condition::Lt),
            Opcode::IfIcmpge => return self.exec_if_icmp(instr, Condition::Ge),
            Opcode::IfIcmpgt => return self.exec_if_icmp(instr, Condition::Gt),
            Opcode::IfIcmple => return self.exec_if_icmp(instr, Condition::Le),
            Opcode::IfAcmpeq => return self.exec_if_acmp(instr, true),
            Opcode::IfAcmpne => return self.exec_if_acmp(instr, false),
            Opcode::Ifnull => return self.exec_if_null(instr, true),
            Opcode::Ifnonnull => return self.exec_if_null(instr, false),

            // Returns
            Opcode::Ireturn => return self.exec_return(op, Kind::Int),
            Opcode::Lreturn => return self.exec_return(op, Kind::Long),
            Opcode::Freturn => return self.exec_return(op, Kind::Float),
            Opcode::Dreturn => return self.exec_return(op, Kind::Double),
            Opcode::Areturn => return self.exec_return(op, Kind::Reference),
            Opcode::Return => return Ok(Control::Return(None)),

            // Static fields and calls
            Opcode::Getstatic => self.exec_getstatic(instr, statics)?,
            Opcode::Putstatic => self.exec_putstatic(instr, statics)?,
            Opcode::Invokestatic => return self.exec_invokestatic(instr),
        }
        Ok(Control::Continue)
    }

    fn bad_operand(&self, opcode: Opcode) -> ExecError {
        ExecError::BadOperand {
            at: self.pc,
            opcode,
        }
    }

    fn local_operand(&self, instr: &Instruction) -> Result<u16, ExecError> {
        match instr.operand {
            Operand::Local(index) => Ok(index),
            _ => Err(self.bad_operand(instr.opcode)),
        }
    }

    fn branch_operand(&self, instr: &Instruction) -> Result<i16, ExecError> {
        match instr.operand {
            Operand::Branch(offset) => Ok(offset),
            _ => Err(self.bad_operand(instr.opcode)),
        }
    }

    // ---- Constants ----

    fn exec_implicit_constant(&mut self, opcode: Opcode) -> Result<(), ExecError> {
        let value = constant::implicit(opcode).ok_or_else(|| self.bad_operand(opcode))?;
        self.push(value)
    }

    fn exec_push_immediate(&mut self, instr: &Instruction) -> Result<(), ExecError> {
        let Operand::Immediate(v) = instr.operand else {
            return Err(self.bad_operand(instr.opcode));
        };
        let value = match instr.opcode {
            Opcode::Bipush => i8::try_from(v).ok().map(constant::bipush),
            _ => i16::try_from(v).ok().map(constant::sipush),
        };
        let value = value.ok_or_else(|| self.bad_operand(instr.opcode))?;
        self.push(value)
    }

    fn exec_ldc(&mut self, instr: &Instruction, wide: bool) -> Result<(), ExecError> {
        match &instr.operand {
            Operand::Constant(value) if constant::loadable(value.kind(), wide) => {
                self.push(value.clone())
            }
            _ => Err(self.bad_operand(instr.opcode)),
        }
    }

    // ---- Locals ----

    fn exec_load(&mut self, opcode: Opcode, kind: Kind, index: u16) -> Result<(), ExecError> {
        let at = self.pc;
        let value = self.locals.load(index).map_err(faulted(at))?;
        if value.kind() != kind {
            // Loads are typed even though slots are not.
            return Err(ExecError::KindMismatch {
                at,
                opcode,
                expected: kind,
                found: value.kind(),
            });
        }
        self.push(value)
    }

    fn exec_store(&mut self, opcode: Opcode, kind: Kind, index: u16) -> Result<(), ExecError> {
        let value = self.pop_kind(opcode, kind)?;
        self.locals.store(index, value).map_err(faulted(self.pc))
    }

    fn exec_iinc(&mut self, instr: &Instruction) -> Result<(), ExecError> {
        let at = self.pc;
        let Operand::Increment { index, delta } = instr.operand else {
            return Err(self.bad_operand(instr.opcode));
        };
        let current = self.locals.load(index).map_err(faulted(at))?;
        let Value::Int32(v) = current else {
            return Err(ExecError::KindMismatch {
                at,
                opcode: Opcode::Iinc,
                expected: Kind::Int,
                found: current.kind(),
            });
        };
        self.locals
            .store(index, Value::Int32(arith::increment(v, delta)))
            .map_err(faulted(at))
    }

    // ---- Arrays ----

    fn exec_newarray(&mut self, instr: &Instruction) -> Result<(), ExecError> {
        match instr.operand {
            Operand::ElementKind(kind) if kind != ElementKind::Reference => {
                self.exec_new_array(instr.opcode, kind)
            }
            _ => Err(self.bad_operand(instr.opcode)),
        }
    }

    fn exec_new_array(&mut self, opcode: Opcode, kind: ElementKind) -> Result<(), ExecError> {
        let size = self.pop_as::<i32>(opcode)?;
        let len = usize::try_from(size).map_err(|_| ExecError::NegativeArraySize {
            at: self.pc,
            size,
        })?;
        self.push(Value::Reference(storage::new_array(kind, len)))
    }

    fn exec_arraylength(&mut self, opcode: Opcode) -> Result<(), ExecError> {
        let array = self.pop_reference(opcode)?;
        let len = storage::array_length(array_cell(&array, self.pc, opcode)?);
        self.push(Value::Int32(len))
    }

    fn exec_array_load(
        &mut self,
        opcode: Opcode,
        expected: ElementKind,
    ) -> Result<(), ExecError> {
        let at = self.pc;
        let index = self.pop_as::<i32>(opcode)?;
        let array = self.pop_reference(opcode)?;
        let cell = array_cell(&array, at, opcode)?;
        if cell.kind() != expected {
            return Err(ExecError::ArrayKindMismatch {
                at,
                opcode,
                found: cell.kind(),
            });
        }
        let value = storage::array_load(cell, index).map_err(faulted(at))?;
        self.push(value)
    }

    fn exec_array_store(
        &mut self,
        opcode: Opcode,
        expected: ElementKind,
    ) -> Result<(), ExecError> {
        let at = self.pc;
        let value = self.pop_kind(opcode, expected.value_kind())?;
        let index = self.pop_as::<i32>(opcode)?;
        let array = self.pop_reference(opcode)?;
        let cell = array_cell(&array, at, opcode)?;
        if cell.kind() != expected {
            return Err(ExecError::ArrayKindMismatch {
                at,
                opcode,
                found: cell.kind(),
            });
        }
        storage::array_store(cell, index, value).map_err(faulted(at))
    }

    // ---- Arithmetic ----

    fn binary<T: Primitive>(
        &mut self,
        opcode: Opcode,
        f: impl FnOnce(T, T) -> T,
    ) -> Result<(), ExecError> {
        let b = self.pop_as::<T>(opcode)?;
        let a = self.pop_as::<T>(opcode)?;
        self.push(f(a, b).into())
    }

    fn binary_checked<T: Primitive>(
        &mut self,
        opcode: Opcode,
        f: impl FnOnce(T, T) -> Result<T, Fault>,
    ) -> Result<(), ExecError> {
        let b = self.pop_as::<T>(opcode)?;
        let a = self.pop_as::<T>(opcode)?;
        let result = f(a, b).map_err(faulted(self.pc))?;
        self.push(result.into())
    }

    fn unary<T: Primitive, U: Into<Value>>(
        &mut self,
        opcode: Opcode,
        f: impl FnOnce(T) -> U,
    ) -> Result<(), ExecError> {
        let a = self.pop_as::<T>(opcode)?;
        self.push(f(a).into())
    }

    /// Shift amounts are always int, whatever the shifted kind.
    fn shift<T: Primitive>(
        &mut self,
        opcode: Opcode,
        f: impl FnOnce(T, i32) -> T,
    ) -> Result<(), ExecError> {
        let amount = self.pop_as::<i32>(opcode)?;
        let a = self.pop_as::<T>(opcode)?;
        self.push(f(a, amount).into())
    }

    // ---- Comparison ----

    fn three_way<T: Primitive>(
        &mut self,
        opcode: Opcode,
        f: impl FnOnce(T, T) -> std::cmp::Ordering,
    ) -> Result<(), ExecError> {
        let b = self.pop_as::<T>(opcode)?;
        let a = self.pop_as::<T>(opcode)?;
        self.push(Value::Int32(compare::ordering_value(f(a, b))))
    }

    fn branch_if(&self, taken: bool, offset: i16) -> Control {
        if taken {
            Control::Branch {
                at: self.pc,
                offset,
            }
        } else {
            Control::Continue
        }
    }

    fn exec_if(&mut self, instr: &Instruction, cond: Condition) -> Result<Control, ExecError> {
        let offset = self.branch_operand(instr)?;
        let a = self.pop_as::<i32>(instr.opcode)?;
        Ok(self.branch_if(compare::int_test(cond, a), offset))
    }

    fn exec_if_icmp(&mut self, instr: &Instruction, cond: Condition) -> Result<Control, ExecError> {
        let offset = self.branch_operand(instr)?;
        let b = self.pop_as::<i32>(instr.opcode)?;
        let a = self.pop_as::<i32>(instr.opcode)?;
        Ok(self.branch_if(compare::int_compare(cond, a, b), offset))
    }

    fn exec_if_acmp(&mut self, instr: &Instruction, equal: bool) -> Result<Control, ExecError> {
        let offset = self.branch_operand(instr)?;
        let b = self.pop_reference(instr.opcode)?;
        let a = self.pop_reference(instr.opcode)?;
        Ok(self.branch_if(compare::same_reference(&a, &b) == equal, offset))
    }

    fn exec_if_null(&mut self, instr: &Instruction, null: bool) -> Result<Control, ExecError> {
        let offset = self.branch_operand(instr)?;
        let a = self.pop_reference(instr.opcode)?;
        Ok(self.branch_if(compare::is_null(&a) == null, offset))
    }

    // ---- Returns, fields, calls ----

    fn exec_return(&mut self, opcode: Opcode, kind: Kind) -> Result<Control, ExecError> {
        let value = self.pop_kind(opcode, kind)?;
        Ok(Control::Return(Some(value)))
    }

    fn field_operand<'i>(&self, instr: &'i Instruction) -> Result<&'i FieldRef, ExecError> {
        match &instr.operand {
            Operand::Field(field) => Ok(field),
            _ => Err(self.bad_operand(instr.opcode)),
        }
    }

    fn exec_getstatic(
        &mut self,
        instr: &Instruction,
        statics: &StaticFields,
    ) -> Result<(), ExecError> {
        let at = self.pc;
        let field = self.field_operand(instr)?;
        let value = statics
            .get(&field.name)
            .map_err(|err| field_error(at, err))?;
        if value.kind() != field.kind {
            return Err(ExecError::FieldKindMismatch {
                at,
                name: field.name.clone(),
                declared: value.kind(),
                found: field.kind,
            });
        }
        self.push(value)
    }

    fn exec_putstatic(
        &mut self,
        instr: &Instruction,
        statics: &StaticFields,
    ) -> Result<(), ExecError> {
        let at = self.pc;
        let field = self.field_operand(instr)?;
        let value = self.pop_kind(instr.opcode, field.kind)?;
        statics
            .put(&field.name, value)
            .map_err(|err| field_error(at, err))
    }

    fn exec_invokestatic(&mut self, instr: &Instruction) -> Result<Control, ExecError> {
        let Operand::Method(method) = &instr.operand else {
            return Err(self.bad_operand(instr.opcode));
        };
        let mut args = Vec::with_capacity(method.params.len());
        for kind in method.params.iter().rev() {
            args.push(self.pop_kind(instr.opcode, *kind)?);
        }
        args.reverse();
        Ok(Control::Invoke {
            method: MethodRef::clone(method),
            args,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalSlots;

    fn run(instrs: Vec<Instruction>) -> Result<Control, ExecError> {
        let mut frame = Frame::new(LocalSlots::new(4));
        frame.run(&Block::new(instrs), &StaticFields::new())
    }

    fn push_int(v: i32) -> Instruction {
        Instruction::new(Opcode::Sipush, Operand::Immediate(v))
    }

    #[test]
    fn iadd_returns() {
        let result = run(vec![
            push_int(5),
            push_int(-1024),
            Opcode::Iadd.into(),
            Opcode::Ireturn.into(),
        ]);
        assert_eq!(result, Ok(Control::Return(Some(Value::Int32(-1019)))));
    }

    #[test]
    fn running_off_the_end_continues() {
        assert_eq!(run(vec![Opcode::Iconst1.into()]), Ok(Control::Continue));
    }

    #[test]
    fn divide_by_zero_reports_index() {
        let result = run(vec![
            Opcode::Iconst1.into(),
            Opcode::Iconst0.into(),
            Opcode::Idiv.into(),
        ]);
        assert_eq!(
            result,
            Err(ExecError::Fault {
                at: 2,
                fault: Fault::DIVIDE_BY_ZERO
            })
        );
    }

    #[test]
    fn kind_mismatch() {
        let result = run(vec![
            Opcode::Lconst1.into(),
            Opcode::Iconst1.into(),
            Opcode::Iadd.into(),
        ]);
        assert_eq!(
            result,
            Err(ExecError::KindMismatch {
                at: 2,
                opcode: Opcode::Iadd,
                expected: Kind::Int,
                found: Kind::Long
            })
        );
    }

    #[test]
    fn bipush_range_is_checked() {
        let result = run(vec![Instruction::new(Opcode::Bipush, Operand::Immediate(128))]);
        assert_eq!(
            result,
            Err(ExecError::BadOperand {
                at: 0,
                opcode: Opcode::Bipush
            })
        );
    }

    #[test]
    fn ldc_rejects_wide_constant() {
        let result = run(vec![Instruction::new(
            Opcode::Ldc,
            Operand::Constant(Value::Int64(3)),
        )]);
        assert!(matches!(result, Err(ExecError::BadOperand { at: 0, .. })));
    }

    #[test]
    fn branch_not_taken_falls_through() {
        let result = run(vec![
            Opcode::Iconst1.into(),
            Instruction::new(Opcode::Ifeq, Operand::Branch(5)),
            Opcode::Iconst2.into(),
            Opcode::Ireturn.into(),
        ]);
        assert_eq!(result, Ok(Control::Return(Some(Value::Int32(2)))));
    }

    #[test]
    fn branch_taken_stops() {
        let mut frame = Frame::new(LocalSlots::new(0));
        let block = Block::new(vec![
            Opcode::Iconst0.into(),
            Instruction::new(Opcode::Ifeq, Operand::Branch(-1)),
        ]);
        let result = frame.run(&block, &StaticFields::new());
        assert_eq!(result, Ok(Control::Branch { at: 1, offset: -1 }));
        assert_eq!(frame.pc(), 2);
    }

    #[test]
    fn negative_array_size() {
        let result = run(vec![
            Opcode::IconstM1.into(),
            Instruction::new(Opcode::Newarray, Operand::ElementKind(ElementKind::Int)),
        ]);
        assert_eq!(
            result,
            Err(ExecError::NegativeArraySize { at: 1, size: -1 })
        );
    }

    #[test]
    fn null_array() {
        let result = run(vec![Opcode::AconstNull.into(), Opcode::Arraylength.into()]);
        assert_eq!(result, Err(ExecError::NullReference { at: 1 }));
    }

    #[test]
    fn load_checks_slot_kind() {
        let result = run(vec![Opcode::Lload0.into()]);
        assert_eq!(
            result,
            Err(ExecError::KindMismatch {
                at: 0,
                opcode: Opcode::Lload0,
                expected: Kind::Long,
                found: Kind::Int
            })
        );
    }

    #[test]
    fn dup_and_swap() {
        let result = run(vec![
            Opcode::Iconst1.into(),
            Opcode::Iconst2.into(),
            Opcode::Swap.into(),
            Opcode::Dup.into(),
            Opcode::Iadd.into(),
            Opcode::Iadd.into(),
            Opcode::Ireturn.into(),
        ]);
        assert_eq!(result, Ok(Control::Return(Some(Value::Int32(4)))));
    }
}
