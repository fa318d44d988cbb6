/// Sets `KEYS[1]` to `ARGV[1]` with a TTL of `ARGV[2]` seconds, adds
/// `KEYS[1]` to the set `KEYS[2]` and gives the set a TTL of `ARGV[3]`
/// seconds.
///
/// Used for search-key registration, record writes and listing writes.
pub const STORE_AND_INDEX: &str = r#"
redis.call('SET', KEYS[1], ARGV[1], 'EX', tonumber(ARGV[2]))
redis.call('SADD', KEYS[2], KEYS[1])
redis.call('EXPIRE', KEYS[2], tonumber(ARGV[3]))
return 1
"#;

/// Deletes every member of the set `KEYS[1]`, then the set itself.
/// Returns the number of member keys purged.
pub const PURGE_INDEX: &str = r#"
local members = redis.call('SMEMBERS', KEYS[1])
for _, key in ipairs(members) do
    redis.call('DEL', key)
end
redis.call('DEL', KEYS[1])
return #members
"#;
