//! Subject programs shared by the integration tests
//!
//! `DEP_TEST` mirrors the dependence self-test suite: one method per loop
//! pattern, plus a `TestCode` class of callees with known purity.

use looppar_analysis::Program;

pub const SIMPLE_DEP1: &str = "<DepTest: simpleDep1(I)V>";
pub const SIMPLE_DEP2: &str = "<DepTest: simpleDep2([I)V>";
pub const SIMPLE_NO_DEP0: &str = "<DepTest: simpleNoDep0([I)V>";
pub const SIMPLE_NO_DEP1: &str = "<DepTest: simpleNoDep1([I)V>";
pub const SIMPLE_NO_DEP2: &str = "<DepTest: simpleNoDep2([I)V>";
pub const PURE_CALL0: &str = "<DepTest: functionCallNotIndexPure0(I)V>";
pub const PURE_CALL1: &str = "<DepTest: functionCallNotIndexPure1(I)V>";
pub const PURE_CALL2: &str = "<DepTest: functionCallNotIndexPure2(I)V>";
pub const IMPURE_CALL0: &str = "<DepTest: functionCallNotIndexImpure0(I)V>";
pub const IMPURE_CALL1: &str = "<DepTest: functionCallNotIndexImpure1(I)V>";
pub const IMPURE_CALL2: &str = "<DepTest: functionCallNotIndexImpure2(I)V>";
pub const IMPURE_CALL3: &str = "<DepTest: functionCallNotIndexImpure3(I)V>";
pub const IMPURE_CALL5: &str = "<DepTest: functionCallNotIndexImpure5(I)V>";
pub const IMPURE_CALL9: &str = "<DepTest: functionCallNotIndexImpure9(I)V>";
pub const CALL_IN_INDEX: &str = "<DepTest: functionCallIndex(I)V>";
pub const STACK_VARIABLE_DEP1: &str = "<DepTest: stackVariableDep1(II[I[II)V>";
pub const MULTI_DIM_NO_DEP1: &str = "<DepTest: multiDimArrayNoDep1(II[[I[[I)V>";
pub const MULTI_DIM_DEP1: &str = "<DepTest: multiDimArrayDep1(II[[I)V>";
pub const NESTED_NO_DEP1: &str = "<DepTest: nestedNoDep1([I)V>";
pub const NESTED_DEP1: &str = "<DepTest: nestedDep1([I)V>";
pub const HILBERT: &str = "<DepTest: hilbertComputation([FII)V>";

pub const DEP_TEST: &str = r#"
// Loop dependence self-test suite
class DepTest {
    method static void main(java.lang.String[]) {
        java.lang.String[] args
        int[] $a0, $a1, $a2, $a3, $a4, $a5, $a6, $a7
        int[][] $m0, $m1, $m2
        float[] $f0
        args := @parameter0: java.lang.String[]
        staticinvoke <DepTest: void simpleDep1(int)>(1000)
        $a0 = newarray (int)[100000]
        staticinvoke <DepTest: void simpleDep2(int[])>($a0)
        $a1 = newarray (int)[1000]
        staticinvoke <DepTest: void simpleNoDep0(int[])>($a1)
        $a2 = newarray (int)[5000]
        staticinvoke <DepTest: void simpleNoDep1(int[])>($a2)
        $a3 = newarray (int)[5000]
        staticinvoke <DepTest: void simpleNoDep2(int[])>($a3)
        staticinvoke <DepTest: void functionCallNotIndexPure0(int)>(59293293)
        staticinvoke <DepTest: void functionCallNotIndexPure1(int)>(59293293)
        staticinvoke <DepTest: void functionCallNotIndexPure2(int)>(59293293)
        staticinvoke <DepTest: void functionCallNotIndexImpure0(int)>(232)
        staticinvoke <DepTest: void functionCallNotIndexImpure1(int)>(232)
        staticinvoke <DepTest: void functionCallNotIndexImpure2(int)>(232)
        staticinvoke <DepTest: void functionCallNotIndexImpure3(int)>(232)
        staticinvoke <DepTest: void functionCallNotIndexImpure5(int)>(232)
        staticinvoke <DepTest: void functionCallNotIndexImpure9(int)>(232)
        staticinvoke <DepTest: void functionCallIndex(int)>(59293293)
        $a4 = newarray (int)[5101]
        $a5 = newarray (int)[5101]
        staticinvoke <DepTest: void stackVariableDep1(int,int,int[],int[],int)>(24, 31, $a4, $a5, 600)
        $m0 = newmultiarray (int)[200][400]
        $m1 = newmultiarray (int)[400][200]
        staticinvoke <DepTest: void multiDimArrayNoDep1(int,int,int[][],int[][])>(35, 42, $m0, $m1)
        $m2 = newmultiarray (int)[200][400]
        staticinvoke <DepTest: void multiDimArrayDep1(int,int,int[][])>(31, 49, $m2)
        $a6 = newarray (int)[2000]
        staticinvoke <DepTest: void nestedDep1(int[])>($a6)
        $a7 = newarray (int)[2000]
        staticinvoke <DepTest: void nestedNoDep1(int[])>($a7)
        $f0 = newarray (float)[3009]
        staticinvoke <DepTest: void hilbertComputation(float[],int,int)>($f0, 51, 59)
        return
    }

    method static int identity(int) {
        int i
        i := @parameter0: int
        return i
    }

    // ar[n - 1] = i
    method static void simpleDep1(int) {
        int n, i, $t
        int[] ar
        n := @parameter0: int
        ar = newarray (int)[n]
        i = 1
    head:
        if i >= n goto done
        $t = n - 1
        ar[$t] = i
        i = i + 1
        goto head
    done:
        return
    }

    // ar[i] += ar[i - 1]
    method static void simpleDep2(int[]) {
        int[] ar
        int i, $n, $v, $t, $w, $s
        ar := @parameter0: int[]
        i = 1
    head:
        $n = lengthof ar
        if i >= $n goto done
        $v = ar[i]
        $t = i - 1
        $w = ar[$t]
        $s = $v + $w
        ar[i] = $s
        i = i + 1
        goto head
    done:
        return
    }

    // ar[i * 3] = i, with bytecode offsets
    method static void simpleNoDep0(int[]) {
        int[] ar
        int i, $t
        [0] ar := @parameter0: int[]
        [1] i = 1
    head:
        [4] if i >= 5 goto done
        [10] $t = i * 3
        [12] ar[$t] = i
        [13] i = i + 1
        [16] goto head
    done:
        [19] return
    }

    // a[i] = i * a[i]
    method static void simpleNoDep1(int[]) {
        int[] a
        int i, $n, $v, $w
        a := @parameter0: int[]
        i = 0
    head:
        $n = lengthof a
        if i >= $n goto done
        $v = a[i]
        $w = i * $v
        a[i] = $w
        i = i + 1
        goto head
    done:
        return
    }

    // a[i - 1] = i * a[i - 1]
    method static void simpleNoDep2(int[]) {
        int[] a
        int i, $n, $t, $v, $w, $u
        a := @parameter0: int[]
        i = 1
    head:
        $n = lengthof a
        if i >= $n goto done
        $t = i - 1
        $v = a[$t]
        $w = i * $v
        $u = i - 1
        a[$u] = $w
        i = i + 1
        goto head
    done:
        return
    }

    method static void functionCallNotIndexPure0(int) {
        int k, i
        int[] a
        k := @parameter0: int
        a = newarray (int)[k]
        i = 0
    head:
        if i >= k goto done
        staticinvoke <DepTest: int identity(int)>(i)
        a[i] = i
        i = i + 1
        goto head
    done:
        return
    }

    method static void functionCallNotIndexPure1(int) {
        int k, i
        k := @parameter0: int
        i = 0
    head:
        if i >= k goto done
        staticinvoke <TestCode: int pureFun(int)>(i)
        i = i + 1
        goto head
    done:
        return
    }

    method static void functionCallNotIndexPure2(int) {
        int k, i
        k := @parameter0: int
        i = 0
    head:
        if i >= k goto done
        staticinvoke <TestCode: int callPureFun(int)>(i)
        i = i + 1
        goto head
    done:
        return
    }

    // calls a method writing its array argument
    method static void functionCallNotIndexImpure0(int) {
        int k, i
        int[] a, $b
        k := @parameter0: int
        a = newarray (int)[k]
        i = 0
    head:
        if i >= k goto done
        $b = newarray (int)[k]
        staticinvoke <DepTest: void simpleNoDep0(int[])>($b)
        a[i] = i
        i = i + 1
        goto head
    done:
        return
    }

    method static void functionCallNotIndexImpure1(int) {
        int k, i
        k := @parameter0: int
        i = 0
    head:
        if i >= k goto done
        staticinvoke <TestCode: void printFun(int)>(i)
        i = i + 1
        goto head
    done:
        return
    }

    method static void functionCallNotIndexImpure2(int) {
        int k, i
        k := @parameter0: int
        i = 0
    head:
        if i >= k goto done
        staticinvoke <TestCode: int gvAccess(int)>(i)
        i = i + 1
        goto head
    done:
        return
    }

    method static void functionCallNotIndexImpure3(int) {
        int k, i
        k := @parameter0: int
        i = 0
    head:
        if i >= k goto done
        staticinvoke <TestCode: void gvModify(int)>(i)
        i = i + 1
        goto head
    done:
        return
    }

    method static void functionCallNotIndexImpure5(int) {
        int k, i, $s
        int[] $arr
        k := @parameter0: int
        i = 0
    head:
        if i >= k goto done
        $s = i + 1
        $arr = newarray (int)[$s]
        staticinvoke <TestCode: void arrModify(int,int,int[])>(i, i, $arr)
        i = i + 1
        goto head
    done:
        return
    }

    method static void functionCallNotIndexImpure9(int) {
        int k, i
        k := @parameter0: int
        i = 0
    head:
        if i >= k goto done
        staticinvoke <TestCode: int callImpureFun(int)>(i)
        i = i + 1
        goto head
    done:
        return
    }

    // a[identity(i)] = i
    method static void functionCallIndex(int) {
        int k, i, $j
        int[] a
        k := @parameter0: int
        a = newarray (int)[k]
        i = 0
    head:
        if i >= k goto done
        $j = staticinvoke <DepTest: int identity(int)>(i)
        a[$j] = i
        i = i + 1
        goto head
    done:
        return
    }

    // k is printed after the loop
    method static void stackVariableDep1(int, int, int[], int[], int) {
        int a, b, k, i, j, $n, $t0, $t1, $v
        int[] x, y
        java.io.PrintStream $out
        a := @parameter0: int
        b := @parameter1: int
        x := @parameter2: int[]
        y := @parameter3: int[]
        k := @parameter4: int
        i = 0
    head:
        $n = lengthof x
        if i >= $n goto done
        j = a * b
        $t0 = a * i
        $t1 = $t0 + b
        $v = x[i]
        y[$t1] = $v
        k = j
        i = i + 1
        goto head
    done:
        $out = <java.lang.System: java.io.PrintStream out>
        virtualinvoke $out.<java.io.PrintStream: void println(int)>(k)
        return
    }

    // y[2 * i][i] = x[i][2 * i] + a * b
    method static void multiDimArrayNoDep1(int, int, int[][], int[][]) {
        int a, b, i, $n, $t0, $v, $p, $s, $t1
        int[][] x, y
        int[] $r, $w
        a := @parameter0: int
        b := @parameter1: int
        x := @parameter2: int[][]
        y := @parameter3: int[][]
        i = 0
    head:
        $n = lengthof x
        if i >= $n goto done
        $r = x[i]
        $t0 = 2 * i
        $v = $r[$t0]
        $p = a * b
        $s = $v + $p
        $t1 = 2 * i
        $w = y[$t1]
        $w[i] = $s
        i = i + 1
        goto head
    done:
        return
    }

    // y[2 * i][i] = y[i][2 * i] + a * b
    method static void multiDimArrayDep1(int, int, int[][]) {
        int a, b, i, $t0, $v, $p, $s, $t1
        int[][] y
        int[] $r, $w
        a := @parameter0: int
        b := @parameter1: int
        y := @parameter2: int[][]
        i = 0
    head:
        if i >= 1000 goto done
        $r = y[i]
        $t0 = 2 * i
        $v = $r[$t0]
        $p = a * b
        $s = $v + $p
        $t1 = 2 * i
        $w = y[$t1]
        $w[i] = $s
        i = i + 1
        goto head
    done:
        return
    }

    // a[i] = i * a[j]
    method static void nestedDep1(int[]) {
        int[] a
        int i, j, $n, $m, $v, $w
        a := @parameter0: int[]
        i = 0
    outer:
        $n = lengthof a
        if i >= $n goto done
        j = 0
    inner:
        $m = lengthof a
        if j >= $m goto next
        $v = a[j]
        $w = i * $v
        a[i] = $w
        j = j + 1
        goto inner
    next:
        i = i + 1
        goto outer
    done:
        return
    }

    // a[j] = i * a[j]
    method static void nestedNoDep1(int[]) {
        int[] a
        int i, j, $n, $m, $v, $w
        a := @parameter0: int[]
        i = 0
    outer:
        $n = lengthof a
        if i >= $n goto done
        j = 0
    inner:
        $m = lengthof a
        if j >= $m goto next
        $v = a[j]
        $w = i * $v
        a[j] = $w
        j = j + 1
        goto inner
    next:
        i = i + 1
        goto outer
    done:
        return
    }

    // output[i * rows + j] = 1 / ((i + 1) + (j + 1) - 1)
    method static void hilbertComputation(float[], int, int) {
        float[] output
        int rows, cols, i, j, $t0, $t1, $t2, $t3, $t4, $t5
        float $f, $g
        output := @parameter0: float[]
        rows := @parameter1: int
        cols := @parameter2: int
        i = 0
    outer:
        if i >= rows goto done
        j = 0
    inner:
        if j >= cols goto next
        $t0 = i * rows
        $t1 = $t0 + j
        $t2 = i + 1
        $t3 = j + 1
        $t4 = $t2 + $t3
        $t5 = $t4 - 1
        $f = (float) $t5
        $g = 1.0F / $f
        output[$t1] = $g
        j = j + 1
        goto inner
    next:
        i = i + 1
        goto outer
    done:
        return
    }
}

// Callees with known purity
class TestCode {
    field static int globalvar1
    field static boolean globalvar2

    method static void printFun(int) {
        int val, a, b
        java.io.PrintStream $out
        val := @parameter0: int
        a = 2
        b = val + a
        $out = <java.lang.System: java.io.PrintStream out>
        virtualinvoke $out.<java.io.PrintStream: void println(int)>(b)
        return
    }

    method static int pureFun(int) {
        int val, a, b
        val := @parameter0: int
        a = 2
        b = a + val
        return b
    }

    method static int gvAccess(int) {
        int val, a, $t, g, b
        val := @parameter0: int
        a = 2
        $t = a + val
        g = <TestCode: int globalvar1>
        b = $t + g
        return b
    }

    method static void gvModify(int) {
        int val, a, b
        val := @parameter0: int
        a = 2
        b = a + val
        <TestCode: int globalvar1> = b
        return
    }

    method static int arrAccess(int, int[]) {
        int index, $v
        int[] arr
        index := @parameter0: int
        arr := @parameter1: int[]
        $v = arr[index]
        return $v
    }

    method static void arrModify(int, int, int[]) {
        int val, index, a, $s
        int[] arr
        val := @parameter0: int
        index := @parameter1: int
        arr := @parameter2: int[]
        a = 2
        $s = a + val
        arr[index] = $s
        return
    }

    method static int callPureFun(int) {
        int val, a, b, $r, c
        val := @parameter0: int
        a = 2
        b = val + a
        $r = staticinvoke <TestCode: int pureFun(int)>(b)
        c = $r + val
        return c
    }

    method static int callImpureFun(int) {
        int val, a, b, $r, c
        val := @parameter0: int
        a = 2
        b = val + a
        $r = staticinvoke <TestCode: int gvAccess(int)>(b)
        c = $r + val
        return c
    }
}
"#;

pub fn dep_test_program() -> Program {
    looppar_analysis::parse_program(DEP_TEST).expect("fixture parses")
}

/// One static method `run(int[], int)` over array `a` with bound `n`:
/// `for i in [lower, n): a[write_scale*i + write_offset] = a[read_scale*i + read_offset] + 1`
pub fn affine_loop(
    lower: i64,
    write_scale: i64,
    write_offset: i64,
    read_scale: i64,
    read_offset: i64,
) -> String {
    format!(
        r#"
class Affine {{
    method static void run(int[], int) {{
        int[] a
        int n, i, $w0, $w, $r0, $r, $v, $s
        a := @parameter0: int[]
        n := @parameter1: int
        i = {lower}
    head:
        if i >= n goto done
        $r0 = {read_scale} * i
        $r = $r0 + {read_offset}
        $v = a[$r]
        $s = $v + 1
        $w0 = {write_scale} * i
        $w = $w0 + {write_offset}
        a[$w] = $s
        i = i + 1
        goto head
    done:
        return
    }}
}}
"#
    )
}

pub const AFFINE_RUN: &str = "<Affine: run([II)V>";

/// `affine_loop` with a scalar `t` added to every stored value. With
/// `carried` the body reads `t` before assigning `t = i`, so each iteration
/// sees the index of the one before it; otherwise `t = i` comes first.
pub fn affine_loop_with_scalar(
    lower: i64,
    write_scale: i64,
    write_offset: i64,
    read_scale: i64,
    read_offset: i64,
    carried: bool,
) -> String {
    let (fresh, late) = if carried {
        ("", "        t = i\n")
    } else {
        ("        t = i\n", "")
    };
    format!(
        r#"
class Affine {{
    method static void run(int[], int) {{
        int[] a
        int n, t, i, $w0, $w, $r0, $r, $v, $s0, $s
        a := @parameter0: int[]
        n := @parameter1: int
        t = 0
        i = {lower}
    head:
        if i >= n goto done
{fresh}        $r0 = {read_scale} * i
        $r = $r0 + {read_offset}
        $v = a[$r]
        $s0 = $v + t
        $s = $s0 + 1
        $w0 = {write_scale} * i
        $w = $w0 + {write_offset}
        a[$w] = $s
{late}        i = i + 1
        goto head
    done:
        return
    }}
}}
"#
    )
}

pub const SIBLINGS_RUN: &str = "<Siblings: run([II)V>";

/// Clears `a[0..n)` with `i`, then reuses `i` as a running sum:
/// `for j in [0, n): i = i + j; a[j] = i`
pub const SIBLING_ACCUMULATOR: &str = r#"
class Siblings {
    method static void run(int[], int) {
        int[] a
        int n, i, j
        a := @parameter0: int[]
        n := @parameter1: int
        i = 0
    clear:
        if i >= n goto sum
        a[i] = 0
        i = i + 1
        goto clear
    sum:
        j = 0
    scan:
        if j >= n goto done
        i = i + j
        a[j] = i
        j = j + 1
        goto scan
    done:
        return
    }
}
"#;
