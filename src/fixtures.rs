#[cfg(test)]
pub mod test {
    /// Two-level config reached through a pointer, tagged with `key`.
    pub const SCENARIO_CONFIG: &str = r#"package config

type Config struct {
	Name   string        `key:"name"`
	Server *ServerConfig `key:"server"`
}

type ServerConfig struct {
	Port int `key:"port"`
}
"#;

    /// A realistic viper config using `mapstructure` tags.
    pub const NESTED_CONFIG: &str = r#"package config

import "time"

// AppConfig is the root of the service configuration.
type AppConfig struct {
	Meta

	Name     string          `mapstructure:"name" json:"name"`
	Debug    bool            `mapstructure:"debug"`
	Workers  uint8           `mapstructure:"workers"`
	Ratio    float64         `mapstructure:"ratio"`
	Level    LogLevel        `mapstructure:"level"`
	Database DatabaseConfig  `mapstructure:"database"`
	Cache    *CacheConfig    `mapstructure:"cache,omitempty"`
	Hosts    []string        `mapstructure:"hosts"`
	Timeout  time.Duration   `mapstructure:"timeout"`
	Limits   struct {
		Burst int `mapstructure:"burst"`
		Rate  int `mapstructure:"rate"`
	} `mapstructure:"limits"`
}

type Meta struct {
	Version string `mapstructure:"version"`
}

type LogLevel string

type DatabaseConfig struct {
	URL      string `mapstructure:"url"`
	PoolSize int    `mapstructure:"pool_size"`
}

type CacheConfig struct {
	Enabled bool `mapstructure:"enabled"`
	TTL     int  `mapstructure:"ttl"`
}
"#;

    /// Same shape as `SCENARIO_CONFIG` but with the server struct by value.
    pub const BY_VALUE_CONFIG: &str = r#"package config

type Config struct {
	Name   string       `key:"name"`
	Server ServerConfig `key:"server"`
}

type ServerConfig struct {
	Port int `key:"port"`
}
"#;
}
