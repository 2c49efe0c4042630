//! Opcode definitions.
//!
//! Each variant carries its JVM opcode byte. Only the instructions whose
//! value semantics the VM implements are listed; control transfer beyond
//! conditional branches, object instructions, and exception handling are
//! not part of this instruction set.

use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;

/// The shape of the resolved operand an opcode carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandShape {
    /// No operand.
    None,
    /// Local slot index.
    Local,
    /// Signed 8-bit immediate (`bipush`).
    Byte,
    /// Signed 16-bit immediate (`sipush`).
    Short,
    /// Category-1 constant: int, float or reference.
    Constant,
    /// Category-2 constant: long or double.
    WideConstant,
    /// Local slot index and signed 16-bit increment.
    Increment,
    /// Signed branch offset.
    Branch,
    /// Array element kind.
    ElementKind,
    /// Static field name and kind.
    Field,
    /// Static method name and signature.
    Method,
}

macro_rules! opcodes {
    ($( $(#[$doc:meta])* $variant:ident = $code:literal, $mnemonic:literal, $shape:ident; )*) => {
        /// Identifies the operation to perform.
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Opcode {
            $( $(#[$doc])* $variant = $code, )*
        }

        /// All opcodes, in opcode byte order.
        pub const ALL_OPCODES: &[Opcode] = &[ $( Opcode::$variant, )* ];

        impl Opcode {
            /// Assembly mnemonic, lowercase as the JVM spells it.
            pub fn mnemonic(&self) -> &'static str {
                match self {
                    $( Opcode::$variant => $mnemonic, )*
                }
            }

            /// The operand this opcode expects.
            pub fn operand_shape(&self) -> OperandShape {
                match self {
                    $( Opcode::$variant => OperandShape::$shape, )*
                }
            }
        }
    };
}

opcodes! {
    // Constants
    /// Push the null reference.
    AconstNull = 0x01, "aconst_null", None;
    IconstM1 = 0x02, "iconst_m1", None;
    Iconst0 = 0x03, "iconst_0", None;
    Iconst1 = 0x04, "iconst_1", None;
    Iconst2 = 0x05, "iconst_2", None;
    Iconst3 = 0x06, "iconst_3", None;
    Iconst4 = 0x07, "iconst_4", None;
    Iconst5 = 0x08, "iconst_5", None;
    Lconst0 = 0x09, "lconst_0", None;
    Lconst1 = 0x0a, "lconst_1", None;
    Fconst0 = 0x0b, "fconst_0", None;
    Fconst1 = 0x0c, "fconst_1", None;
    Fconst2 = 0x0d, "fconst_2", None;
    Dconst0 = 0x0e, "dconst_0", None;
    Dconst1 = 0x0f, "dconst_1", None;
    /// Push a sign-extended byte.
    Bipush = 0x10, "bipush", Byte;
    /// Push a sign-extended short.
    Sipush = 0x11, "sipush", Short;
    /// Push a category-1 constant.
    Ldc = 0x12, "ldc", Constant;
    /// Push a category-1 constant (wide pool index).
    LdcW = 0x13, "ldc_w", Constant;
    /// Push a long or double constant.
    Ldc2W = 0x14, "ldc2_w", WideConstant;

    // Loads
    Iload = 0x15, "iload", Local;
    Lload = 0x16, "lload", Local;
    Fload = 0x17, "fload", Local;
    Dload = 0x18, "dload", Local;
    Aload = 0x19, "aload", Local;
    Iload0 = 0x1a, "iload_0", None;
    Iload1 = 0x1b, "iload_1", None;
    Iload2 = 0x1c, "iload_2", None;
    Iload3 = 0x1d, "iload_3", None;
    Lload0 = 0x1e, "lload_0", None;
    Lload1 = 0x1f, "lload_1", None;
    Lload2 = 0x20, "lload_2", None;
    Lload3 = 0x21, "lload_3", None;
    Fload0 = 0x22, "fload_0", None;
    Fload1 = 0x23, "fload_1", None;
    Fload2 = 0x24, "fload_2", None;
    Fload3 = 0x25, "fload_3", None;
    Dload0 = 0x26, "dload_0", None;
    Dload1 = 0x27, "dload_1", None;
    Dload2 = 0x28, "dload_2", None;
    Dload3 = 0x29, "dload_3", None;
    Aload0 = 0x2a, "aload_0", None;
    Aload1 = 0x2b, "aload_1", None;
    Aload2 = 0x2c, "aload_2", None;
    Aload3 = 0x2d, "aload_3", None;

    // Array loads: pop index, pop array, push element.
    Iaload = 0x2e, "iaload", None;
    Laload = 0x2f, "laload", None;
    Faload = 0x30, "faload", None;
    Daload = 0x31, "daload", None;
    Aaload = 0x32, "aaload", None;
    Baload = 0x33, "baload", None;
    Caload = 0x34, "caload", None;
    Saload = 0x35, "saload", None;

    // Stores
    Istore = 0x36, "istore", Local;
    Lstore = 0x37, "lstore", Local;
    Fstore = 0x38, "fstore", Local;
    Dstore = 0x39, "dstore", Local;
    Astore = 0x3a, "astore", Local;
    Istore0 = 0x3b, "istore_0", None;
    Istore1 = 0x3c, "istore_1", None;
    Istore2 = 0x3d, "istore_2", None;
    Istore3 = 0x3e, "istore_3", None;
    Lstore0 = 0x3f, "lstore_0", None;
    Lstore1 = 0x40, "lstore_1", None;
    Lstore2 = 0x41, "lstore_2", None;
    Lstore3 = 0x42, "lstore_3", None;
    Fstore0 = 0x43, "fstore_0", None;
    Fstore1 = 0x44, "fstore_1", None;
    Fstore2 = 0x45, "fstore_2", None;
    Fstore3 = 0x46, "fstore_3", None;
    Dstore0 = 0x47, "dstore_0", None;
    Dstore1 = 0x48, "dstore_1", None;
    Dstore2 = 0x49, "dstore_2", None;
    Dstore3 = 0x4a, "dstore_3", None;
    Astore0 = 0x4b, "astore_0", None;
    Astore1 = 0x4c, "astore_1", None;
    Astore2 = 0x4d, "astore_2", None;
    Astore3 = 0x4e, "astore_3", None;

    // Array stores: pop value, pop index, pop array.
    Iastore = 0x4f, "iastore", None;
    Lastore = 0x50, "lastore", None;
    Fastore = 0x51, "fastore", None;
    Dastore = 0x52, "dastore", None;
    Aastore = 0x53, "aastore", None;
    Bastore = 0x54, "bastore", None;
    Castore = 0x55, "castore", None;
    Sastore = 0x56, "sastore", None;

    // Stack
    Pop = 0x57, "pop", None;
    Dup = 0x59, "dup", None;
    Swap = 0x5f, "swap", None;

    // Arithmetic
    Iadd = 0x60, "iadd", None;
    Ladd = 0x61, "ladd", None;
    Fadd = 0x62, "fadd", None;
    Dadd = 0x63, "dadd", None;
    Isub = 0x64, "isub", None;
    Lsub = 0x65, "lsub", None;
    Fsub = 0x66, "fsub", None;
    Dsub = 0x67, "dsub", None;
    Imul = 0x68, "imul", None;
    Lmul = 0x69, "lmul", None;
    Fmul = 0x6a, "fmul", None;
    Dmul = 0x6b, "dmul", None;
    Idiv = 0x6c, "idiv", None;
    Ldiv = 0x6d, "ldiv", None;
    Fdiv = 0x6e, "fdiv", None;
    Ddiv = 0x6f, "ddiv", None;
    Irem = 0x70, "irem", None;
    Lrem = 0x71, "lrem", None;
    Frem = 0x72, "frem", None;
    Drem = 0x73, "drem", None;
    Ineg = 0x74, "ineg", None;
    Lneg = 0x75, "lneg", None;
    Fneg = 0x76, "fneg", None;
    Dneg = 0x77, "dneg", None;

    // Shifts and bitwise. Long shifts take an int shift amount.
    Ishl = 0x78, "ishl", None;
    Lshl = 0x79, "lshl", None;
    Ishr = 0x7a, "ishr", None;
    Lshr = 0x7b, "lshr", None;
    Iushr = 0x7c, "iushr", None;
    Lushr = 0x7d, "lushr", None;
    Iand = 0x7e, "iand", None;
    Land = 0x7f, "land", None;
    Ior = 0x80, "ior", None;
    Lor = 0x81, "lor", None;
    Ixor = 0x82, "ixor", None;
    Lxor = 0x83, "lxor", None;
    /// Add a signed constant to an int local in place.
    Iinc = 0x84, "iinc", Increment;

    // Conversions
    I2l = 0x85, "i2l", None;
    I2f = 0x86, "i2f", None;
    I2d = 0x87, "i2d", None;
    L2i = 0x88, "l2i", None;
    L2f = 0x89, "l2f", None;
    L2d = 0x8a, "l2d", None;
    F2i = 0x8b, "f2i", None;
    F2l = 0x8c, "f2l", None;
    F2d = 0x8d, "f2d", None;
    D2i = 0x8e, "d2i", None;
    D2l = 0x8f, "d2l", None;
    D2f = 0x90, "d2f", None;
    I2b = 0x91, "i2b", None;
    I2c = 0x92, "i2c", None;
    I2s = 0x93, "i2s", None;

    // Three-way comparison
    Lcmp = 0x94, "lcmp", None;
    /// Float compare, NaN gives -1.
    Fcmpl = 0x95, "fcmpl", None;
    /// Float compare, NaN gives 1.
    Fcmpg = 0x96, "fcmpg", None;
    /// Double compare, NaN gives -1.
    Dcmpl = 0x97, "dcmpl", None;
    /// Double compare, NaN gives 1.
    Dcmpg = 0x98, "dcmpg", None;

    // Conditional branches
    Ifeq = 0x99, "ifeq", Branch;
    Ifne = 0x9a, "ifne", Branch;
    Iflt = 0x9b, "iflt", Branch;
    Ifge = 0x9c, "ifge", Branch;
    Ifgt = 0x9d, "ifgt", Branch;
    Ifle = 0x9e, "ifle", Branch;
    IfIcmpeq = 0x9f, "if_icmpeq", Branch;
    IfIcmpne = 0xa0, "if_icmpne", Branch;
    IfIcmplt = 0xa1, "if_icmplt", Branch;
    IfIcmpge = 0xa2, "if_icmpge", Branch;
    IfIcmpgt = 0xa3, "if_icmpgt", Branch;
    IfIcmple = 0xa4, "if_icmple", Branch;
    IfAcmpeq = 0xa5, "if_acmpeq", Branch;
    IfAcmpne = 0xa6, "if_acmpne", Branch;

    // Returns
    Ireturn = 0xac, "ireturn", None;
    Lreturn = 0xad, "lreturn", None;
    Freturn = 0xae, "freturn", None;
    Dreturn = 0xaf, "dreturn", None;
    Areturn = 0xb0, "areturn", None;
    Return = 0xb1, "return", None;

    // Static fields and calls
    Getstatic = 0xb2, "getstatic", Field;
    Putstatic = 0xb3, "putstatic", Field;
    Invokestatic = 0xb8, "invokestatic", Method;

    // Arrays
    /// Create a primitive array. Pops the length.
    Newarray = 0xbc, "newarray", ElementKind;
    /// Create a reference array. Pops the length.
    Anewarray = 0xbd, "anewarray", None;
    Arraylength = 0xbe, "arraylength", None;

    Ifnull = 0xc6, "ifnull", Branch;
    Ifnonnull = 0xc7, "ifnonnull", Branch;
}

impl Opcode {
    /// JVM opcode byte.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl FromStr for Opcode {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic() == s)
            .copied()
            .ok_or_else(|| DecodeError::UnknownMnemonic(s.to_string()))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
