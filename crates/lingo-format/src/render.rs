//! Printf-style template rendering with the raw/localized asymmetry.
//!
//! # Invariants
//!
//! 1. Rendering never panics and never fails: malformed templates are
//!    returned verbatim, missing arguments render as `%!v(MISSING)`
//!    diagnostics, and type mismatches render as `%!v(value)`.
//! 2. Raw verbs substitute exactly the digits the value carries; only
//!    `%s`/`%v` consult the locale formatter.

use crate::args::FormatArg;
use crate::formatter::Formatter;
use crate::specifier::{FormatSpec, Site, scan_sites};

/// Substitute `args` into `template` using `formatter` for localizable
/// sites.
///
/// ```
/// use lingo_format::{Formatter, render_template, msg_args};
///
/// let f = Formatter::new("en".parse().unwrap());
/// let out = render_template("port %d, total %s", &msg_args![8080, 1_234_567], &f);
/// assert_eq!(out, "port 8080, total 1,234,567");
/// ```
#[must_use]
pub fn render_template(template: &str, args: &[FormatArg], formatter: &Formatter) -> String {
    let sites = match scan_sites(template) {
        Ok(sites) => sites,
        // Lookup is total: a template that fails analysis (typically an
        // echoed key containing a stray '%') is passed through untouched.
        Err(_) => return template.to_string(),
    };

    let mut out = String::with_capacity(template.len() + 16);
    let mut used = vec![false; args.len()];
    let mut any_explicit = false;

    for site in &sites {
        match site {
            Site::Literal { start, end } => out.push_str(&template[*start..*end]),
            Site::Escape => out.push('%'),
            Site::Spec(spec) => {
                any_explicit |= spec.explicit_index;
                out.push_str(&render_spec(spec, args, &mut used, formatter));
            }
        }
    }

    // Surplus arguments are surfaced rather than silently dropped,
    // except under explicit indices where re-use is intentional.
    if !any_explicit {
        let extras: Vec<String> = args
            .iter()
            .zip(&used)
            .filter(|(_, consumed)| !**consumed)
            .map(|(arg, _)| arg.plain())
            .collect();
        if !extras.is_empty() {
            out.push_str("%!(EXTRA ");
            out.push_str(&extras.join(", "));
            out.push(')');
        }
    }
    out
}

fn render_spec(
    spec: &FormatSpec,
    args: &[FormatArg],
    used: &mut [bool],
    formatter: &Formatter,
) -> String {
    let Some(arg) = args.get(spec.arg_index) else {
        return format!("%!{}(MISSING)", spec.verb);
    };
    used[spec.arg_index] = true;

    let body = match spec.verb {
        'd' => decimal(arg, spec),
        'x' => radix(arg, spec, 16, false),
        'X' => radix(arg, spec, 16, true),
        'o' => radix(arg, spec, 8, false),
        'b' => radix(arg, spec, 2, false),
        'f' | 'F' => fixed_float(arg, spec),
        't' => match arg {
            FormatArg::Bool(b) => b.to_string(),
            other => mismatch(spec.verb, other),
        },
        'q' => quoted(arg, spec),
        'c' => character(arg, spec),
        's' | 'v' => localized(arg, spec, formatter),
        _ => mismatch(spec.verb, arg),
    };
    pad(body, spec)
}

fn decimal(arg: &FormatArg, spec: &FormatSpec) -> String {
    match arg {
        FormatArg::Int(n) => with_sign(n.to_string(), *n >= 0, spec),
        FormatArg::Uint(n) => with_sign(n.to_string(), true, spec),
        other => mismatch(spec.verb, other),
    }
}

fn radix(arg: &FormatArg, spec: &FormatSpec, base: u32, upper: bool) -> String {
    let (negative, magnitude) = match arg {
        FormatArg::Int(n) => (*n < 0, (i128::from(*n)).unsigned_abs()),
        FormatArg::Uint(n) => (false, u128::from(*n)),
        other => return mismatch(spec.verb, other),
    };
    let digits = match (base, upper) {
        (16, false) => format!("{magnitude:x}"),
        (16, true) => format!("{magnitude:X}"),
        (8, _) => format!("{magnitude:o}"),
        _ => format!("{magnitude:b}"),
    };
    let prefix = if spec.flags.alternate {
        match (base, upper) {
            (16, false) => "0x",
            (16, true) => "0X",
            (8, _) => "0",
            _ => "",
        }
    } else {
        ""
    };
    let sign = if negative { "-" } else { "" };
    format!("{sign}{prefix}{digits}")
}

fn fixed_float(arg: &FormatArg, spec: &FormatSpec) -> String {
    match arg {
        FormatArg::Float(v) => {
            let precision = spec.precision.unwrap_or(6);
            with_sign(format!("{v:.precision$}"), *v >= 0.0, spec)
        }
        other => mismatch(spec.verb, other),
    }
}

fn quoted(arg: &FormatArg, spec: &FormatSpec) -> String {
    match arg {
        FormatArg::Str(s) => format!("{s:?}"),
        FormatArg::Char(c) => format!("{c:?}"),
        other => mismatch(spec.verb, other),
    }
}

fn character(arg: &FormatArg, spec: &FormatSpec) -> String {
    match arg {
        FormatArg::Char(c) => c.to_string(),
        FormatArg::Int(n) => u32::try_from(*n)
            .ok()
            .and_then(char::from_u32)
            .map(|c| c.to_string())
            .unwrap_or_else(|| mismatch(spec.verb, arg)),
        FormatArg::Uint(n) => u32::try_from(*n)
            .ok()
            .and_then(char::from_u32)
            .map(|c| c.to_string())
            .unwrap_or_else(|| mismatch(spec.verb, arg)),
        other => mismatch(spec.verb, other),
    }
}

/// `%s`/`%v`: the user-facing verbs. Numeric values pick up the locale's
/// grouping and decimal conventions; strings may be truncated by the
/// precision field.
fn localized(arg: &FormatArg, spec: &FormatSpec, formatter: &Formatter) -> String {
    match arg {
        FormatArg::Int(n) => formatter.format_int(*n),
        FormatArg::Uint(n) => formatter.format_uint(*n),
        FormatArg::Float(v) => formatter.format_float(*v, spec.precision),
        FormatArg::Str(s) => match spec.precision {
            Some(max) => s.chars().take(max).collect(),
            None => s.clone(),
        },
        FormatArg::Char(c) => c.to_string(),
        FormatArg::Bool(b) => b.to_string(),
    }
}

fn mismatch(verb: char, arg: &FormatArg) -> String {
    format!("%!{verb}({})", arg.plain())
}

fn with_sign(body: String, non_negative: bool, spec: &FormatSpec) -> String {
    if non_negative && spec.flags.plus {
        format!("+{body}")
    } else if non_negative && spec.flags.space {
        format!(" {body}")
    } else {
        body
    }
}

fn pad(body: String, spec: &FormatSpec) -> String {
    let Some(width) = spec.width else {
        return body;
    };
    let len = body.chars().count();
    if len >= width {
        return body;
    }
    let fill = width - len;
    if spec.flags.left_align {
        let mut out = body;
        out.extend(std::iter::repeat_n(' ', fill));
        out
    } else if spec.flags.zero_pad {
        // Zero padding goes between the sign and the digits.
        let (sign, rest) = match body.strip_prefix(['-', '+']) {
            Some(rest) => (&body[..1], rest),
            None => ("", body.as_str()),
        };
        let zeros: String = std::iter::repeat_n('0', fill).collect();
        format!("{sign}{zeros}{rest}")
    } else {
        let spaces: String = std::iter::repeat_n(' ', fill).collect();
        format!("{spaces}{body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::NBSP;
    use crate::msg_args;

    fn fmt(tag: &str) -> Formatter {
        Formatter::new(tag.parse().expect("valid tag"))
    }

    #[test]
    fn raw_decimal_never_gains_grouping() {
        let out = render_template("port %d", &msg_args![8080], &fmt("fr"));
        assert_eq!(out, "port 8080");
        let out = render_template("count %d", &msg_args![1_234_567], &fmt("de"));
        assert_eq!(out, "count 1234567");
    }

    #[test]
    fn localizable_verbs_group_numbers() {
        let out = render_template("total %s", &msg_args![1_234_567], &fmt("fr"));
        assert_eq!(out, format!("total 1{NBSP}234{NBSP}567"));
        let out = render_template("total %v", &msg_args![1_234_567], &fmt("en"));
        assert_eq!(out, "total 1,234,567");
    }

    #[test]
    fn raw_and_localized_coexist() {
        // The raw port keeps its digits while the user-facing total is
        // grouped for the locale.
        let out = render_template(
            "port %d, total %s",
            &msg_args![8080, 1_234_567],
            &fmt("fr"),
        );
        assert_eq!(out, format!("port 8080, total 1{NBSP}234{NBSP}567"));
        assert!(out.contains("8080"));
        assert!(!out.contains("8 080"));
    }

    #[test]
    fn escaped_percent_renders_once() {
        let out = render_template("done 100%%", &msg_args![], &fmt("en"));
        assert_eq!(out, "done 100%");
    }

    #[test]
    fn positional_indices_reorder_and_reuse() {
        let out = render_template(
            "%[2]s before %[1]s",
            &msg_args!["alpha", "beta"],
            &fmt("en"),
        );
        assert_eq!(out, "beta before alpha");
        let out = render_template("%[1]s and %[1]s", &msg_args!["twice"], &fmt("en"));
        assert_eq!(out, "twice and twice");
    }

    #[test]
    fn missing_argument_renders_a_diagnostic() {
        let out = render_template("have %d and %s", &msg_args![1], &fmt("en"));
        assert_eq!(out, "have 1 and %!s(MISSING)");
    }

    #[test]
    fn surplus_arguments_are_surfaced() {
        let out = render_template("just %d", &msg_args![1, "extra"], &fmt("en"));
        assert_eq!(out, "just 1%!(EXTRA extra)");
    }

    #[test]
    fn surplus_suppressed_under_explicit_indices() {
        let out = render_template("%[1]d", &msg_args![1, "spare"], &fmt("en"));
        assert_eq!(out, "1");
    }

    #[test]
    fn malformed_template_passes_through() {
        let out = render_template("broken %", &msg_args![1], &fmt("en"));
        assert_eq!(out, "broken %");
    }

    #[test]
    fn hex_octal_binary_stay_raw() {
        let out = render_template(
            "%x %o %b",
            &msg_args![255, 8, 5],
            &fmt("fr"),
        );
        assert_eq!(out, "ff 10 101");
        let out = render_template("%#x %#X", &msg_args![255, 255], &fmt("en"));
        assert_eq!(out, "0xff 0XFF");
        let out = render_template("%x", &msg_args![-255], &fmt("en"));
        assert_eq!(out, "-ff");
    }

    #[test]
    fn fixed_float_defaults_to_six_decimals() {
        let out = render_template("%f", &msg_args![1.5], &fmt("en"));
        assert_eq!(out, "1.500000");
        let out = render_template("%.2f", &msg_args![1.567], &fmt("en"));
        assert_eq!(out, "1.57");
    }

    #[test]
    fn fixed_float_ignores_locale() {
        let out = render_template("%.2f", &msg_args![1234.5], &fmt("de"));
        assert_eq!(out, "1234.50");
    }

    #[test]
    fn bool_quoted_and_char_verbs() {
        let out = render_template("%t", &msg_args![true], &fmt("en"));
        assert_eq!(out, "true");
        let out = render_template("%q", &msg_args!["say \"hi\""], &fmt("en"));
        assert_eq!(out, "\"say \\\"hi\\\"\"");
        let out = render_template("%c", &msg_args!['x'], &fmt("en"));
        assert_eq!(out, "x");
        let out = render_template("%c", &msg_args![65], &fmt("en"));
        assert_eq!(out, "A");
    }

    #[test]
    fn width_and_alignment() {
        let out = render_template("[%5d]", &msg_args![42], &fmt("en"));
        assert_eq!(out, "[   42]");
        let out = render_template("[%-5d]", &msg_args![42], &fmt("en"));
        assert_eq!(out, "[42   ]");
        let out = render_template("[%05d]", &msg_args![-42], &fmt("en"));
        assert_eq!(out, "[-0042]");
        let out = render_template("[%+d]", &msg_args![42], &fmt("en"));
        assert_eq!(out, "[+42]");
    }

    #[test]
    fn string_precision_truncates() {
        let out = render_template("%.3s", &msg_args!["abcdef"], &fmt("en"));
        assert_eq!(out, "abc");
    }

    #[test]
    fn type_mismatch_renders_a_diagnostic() {
        let out = render_template("%d", &msg_args!["nope"], &fmt("en"));
        assert_eq!(out, "%!d(nope)");
        let out = render_template("%t", &msg_args![3], &fmt("en"));
        assert_eq!(out, "%!t(3)");
    }

    #[test]
    fn float_shortest_form_under_v() {
        let out = render_template("%v", &msg_args![3.25], &fmt("fr"));
        assert_eq!(out, "3,25");
    }
}
