//! Built-in declarations.
//!
//! Keyword types (`string`, `number`, ...) map straight to fixed type ids.
//! Library types are written as declaration source, parsed as a separate
//! file and bound into the same global scope as the checked program.

use crate::ty::TypeId;

/// Keyword-like type names; these cannot be shadowed.
pub fn builtin_type(name: &str) -> Option<TypeId> {
    let ty = match name {
        "any" | "object" | "symbol" | "bigint" => TypeId::ANY,
        "unknown" => TypeId::UNKNOWN,
        "never" => TypeId::NEVER,
        "undefined" => TypeId::UNDEFINED,
        "string" => TypeId::STRING,
        "number" => TypeId::NUMBER,
        "boolean" => TypeId::BOOLEAN,
        _ => return None,
    };
    Some(ty)
}

pub const PRELUDE: &str = r#"
interface String {
    length: number;
    charAt(pos: number): string;
    indexOf(search: string): number;
    slice(start?: number, end?: number): string;
    split(separator: string): string[];
    startsWith(search: string): boolean;
    endsWith(search: string): boolean;
    includes(search: string): boolean;
    toUpperCase(): string;
    toLowerCase(): string;
    trim(): string;
}

interface Array<T> {
    length: number;
    push(...items: T[]): number;
    pop(): T | undefined;
    join(separator?: string): string;
    map<U>(callback: (value: T, index: number) => U): U[];
    filter(predicate: (value: T, index: number) => boolean): T[];
    includes(value: T): boolean;
    indexOf(value: T): number;
    slice(start?: number, end?: number): T[];
    concat(...items: T[][]): T[];
}

interface ArrayConstructor {
    isArray(value: any): boolean;
}

declare const Array: ArrayConstructor;

declare class Date {
    constructor(value?: number | string);
    getTime(): number;
    getFullYear(): number;
    toISOString(): string;
}

declare class ArrayBuffer {
    constructor(byteLength: number);
    byteLength: number;
    slice(begin: number, end?: number): ArrayBuffer;
}

interface Promise<T> {
    then<R>(onfulfilled: (value: T) => R): Promise<R>;
}

type Record<K, T> = { [key: string]: T };

declare function parseInt(text: string): number;
declare function parseFloat(text: string): number;
declare function String(value: any): string;
declare function Number(value: any): number;
declare function Boolean(value: any): boolean;

declare const console: { log(...data: any[]): void; error(...data: any[]): void };
declare const JSON: { stringify(value: any): string; parse(text: string): any };
declare const Math: {
    floor(x: number): number;
    max(...values: number[]): number;
    min(...values: number[]): number;
};
"#;
